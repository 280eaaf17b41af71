//! # DSG Dashboard
//!
//! Reactive dashboard for distributed solar generation.
//!
//! ## Architecture
//!
//! ```text
//! browser ──ws──► session ──► Document ──► dsg_core::Views ──► BoundSources
//!    │                             ▲
//!    └──http──► /api/layout        └── Arc<Dataset> (loaded once)
//! ```
//!
//! - [`DashboardApp`]: an app directory (config, dataset, layout)
//! - [`Document`]: one session's controls and bound sources
//! - [`server`]: axum routes and the WebSocket session loop

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod server;
pub mod sources;

pub use app::DashboardApp;
pub use config::{DashboardConfig, CONFIG_FILE_NAME};
pub use document::Document;
pub use error::{Error, Result};
pub use layout::DashboardLayout;
pub use server::{OriginPolicy, ServeOptions};
pub use sources::BoundSources;
