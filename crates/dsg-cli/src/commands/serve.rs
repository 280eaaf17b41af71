use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use dsg_dashboard::{server, DashboardApp, ServeOptions};
use tracing::info;

/// Load the app directory and serve it until the process is stopped.
///
/// Flags win over the `[server]` table of `dsg.toml`.
pub fn handle(app_dir: &Path, addr: Option<SocketAddr>, origins: &[String]) -> Result<()> {
    let app = DashboardApp::load(app_dir)
        .with_context(|| format!("loading app directory {}", app_dir.display()))?;

    let addr = match addr {
        Some(addr) => addr,
        None => app.config.server.bind_addr()?,
    };
    let allow_websocket_origin = if origins.is_empty() {
        app.config.server.allow_websocket_origin.clone()
    } else {
        origins.to_vec()
    };
    info!(
        "websocket origins: {}",
        if allow_websocket_origin.is_empty() {
            "local only".to_string()
        } else {
            allow_websocket_origin.join(", ")
        }
    );

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(server::run(
        app,
        ServeOptions {
            addr,
            allow_websocket_origin,
        },
    ))
}
