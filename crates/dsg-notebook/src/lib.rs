//! Notebook-server hook that starts the dashboard in a child process.
//!
//! The notebook server calls [`load_server_extension`] while loading its
//! extensions; the only effect is spawning `dsg serve <app_dir>` with a
//! wildcard websocket origin.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use dsg_dashboard::DashboardConfig;
use serde::Serialize;
use tracing::info;

/// Options for launching the dashboard process.
#[derive(Debug, Clone)]
pub struct ExtensionOptions {
    /// Executable providing the `serve` subcommand.
    pub program: PathBuf,
    pub app_dir: PathBuf,
    pub allow_websocket_origin: String,
}

impl ExtensionOptions {
    /// Builds a configuration serving the provided app directory.
    pub fn with_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("dsg"),
            app_dir: app_dir.into(),
            allow_websocket_origin: "*".to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for ExtensionOptions {
    fn default() -> Self {
        Self::with_app_dir("viz-small")
    }
}

/// The detached dashboard process.
#[derive(Debug, Clone, Serialize)]
pub struct ServerLaunch {
    pub pid: u32,
    pub url: String,
    pub app_dir: PathBuf,
}

/// Build the `serve` command without spawning it.
pub fn serve_command(options: &ExtensionOptions) -> Command {
    let mut command = Command::new(&options.program);
    command
        .arg("serve")
        .arg(&options.app_dir)
        .arg(format!(
            "--allow-websocket-origin={}",
            options.allow_websocket_origin
        ));
    command
}

/// Spawn the dashboard server and return without waiting for it.
pub fn load_server_extension(options: ExtensionOptions) -> Result<ServerLaunch> {
    let app_dir = normalize_app_dir(&options.app_dir)?;
    let url = server_url(&app_dir)?;
    let options = ExtensionOptions { app_dir, ..options };

    let child = serve_command(&options)
        .stdin(Stdio::null())
        .spawn()
        .with_context(|| {
            format!(
                "failed to start `{} serve {}`",
                options.program.display(),
                options.app_dir.display()
            )
        })?;

    info!(pid = child.id(), %url, "dashboard server started");

    Ok(ServerLaunch {
        pid: child.id(),
        url,
        app_dir: options.app_dir,
    })
}

/// Address the dashboard will answer on, from `[server].bind` in the app's `dsg.toml`.
pub fn server_url(app_dir: &Path) -> Result<String> {
    let config = DashboardConfig::load_app_dir(app_dir)
        .with_context(|| format!("reading dashboard config in {}", app_dir.display()))?;
    let bind = config.server.bind_addr()?;
    if bind.ip().is_unspecified() {
        Ok(format!("http://localhost:{}/", bind.port()))
    } else {
        Ok(format!("http://{bind}/"))
    }
}

fn normalize_app_dir(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to read current directory")?
            .join(path)
    };

    Ok(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn command_passes_directory_and_wildcard_origin() {
        let options = ExtensionOptions::with_app_dir("viz-small");
        let command = serve_command(&options);

        assert_eq!(command.get_program(), OsStr::new("dsg"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            [
                OsStr::new("serve"),
                OsStr::new("viz-small"),
                OsStr::new("--allow-websocket-origin=*"),
            ]
        );
    }

    #[test]
    fn relative_app_dir_is_resolved() {
        let resolved = normalize_app_dir(Path::new("viz-small")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("viz-small"));
    }

    #[test]
    fn url_follows_configured_bind_address() {
        let dir = tempdir().unwrap();
        assert_eq!(server_url(dir.path()).unwrap(), "http://127.0.0.1:5006/");

        fs::write(
            dir.path().join("dsg.toml"),
            "[server]\nbind = \"127.0.0.1:6100\"\n",
        )
        .unwrap();
        assert_eq!(server_url(dir.path()).unwrap(), "http://127.0.0.1:6100/");

        fs::write(dir.path().join("dsg.toml"), "[server]\nbind = \"0.0.0.0:8080\"\n").unwrap();
        assert_eq!(server_url(dir.path()).unwrap(), "http://localhost:8080/");
    }

    #[test]
    fn missing_program_is_reported() {
        let dir = tempdir().unwrap();
        let options = ExtensionOptions::with_app_dir(dir.path())
            .with_program(dir.path().join("no-such-dsg"));

        let err = load_server_extension(options).unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }
}
