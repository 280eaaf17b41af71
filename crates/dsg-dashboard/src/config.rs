//! Per-app dashboard configuration.
//!
//! An app directory may carry a `dsg.toml`; unspecified values fall back to
//! the defaults below, so a bare directory holding `data/solar_preds_viz.csv`
//! is a valid app.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use dsg_core::{Controls, DsgResult, EFFICIENCY_RANGE, SURFACE_RANGE};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up inside an app directory.
pub const CONFIG_FILE_NAME: &str = "dsg.toml";

/// Main configuration of one dashboard app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Browser document title.
    pub title: String,

    pub data: DataConfig,

    /// Initial widget values.
    pub controls: ControlDefaults,

    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Transpower Demo".to_string(),
            data: DataConfig::default(),
            controls: ControlDefaults::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Dataset CSV, relative to the app directory unless absolute.
    pub file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("data/solar_preds_viz.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlDefaults {
    pub station: String,
    pub efficiency: f64,
    pub surface: f64,
}

impl Default for ControlDefaults {
    fn default() -> Self {
        Self {
            station: dsg_core::ALL_STATIONS.to_string(),
            efficiency: EFFICIENCY_RANGE.default,
            surface: SURFACE_RANGE.default,
        }
    }
}

impl ControlDefaults {
    pub fn to_controls(&self) -> DsgResult<Controls> {
        let controls = Controls::new(self.station.as_str(), self.efficiency, self.surface);
        controls.validate()?;
        Ok(controls)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind: String,

    /// Origins (`host[:port]`) allowed to open a WebSocket session; `*` allows any.
    pub allow_websocket_origin: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5006".to_string(),
            allow_websocket_origin: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address '{}': {e}", self.bind)))
    }
}

impl DashboardConfig {
    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `dsg.toml` from an app directory, or defaults when it is absent.
    pub fn load_app_dir(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the dataset path against the app directory.
    pub fn data_path(&self, app_dir: &Path) -> PathBuf {
        if self.data.file.is_absolute() {
            self.data.file.clone()
        } else {
            app_dir.join(&self.data.file)
        }
    }
}
