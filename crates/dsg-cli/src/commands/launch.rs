use std::path::Path;

use anyhow::{Context, Result};
use dsg_notebook::{load_server_extension, ExtensionOptions};
use tracing::info;

pub fn handle(app_dir: &Path, program: Option<&Path>) -> Result<()> {
    let program = match program {
        Some(path) => path.to_path_buf(),
        None => std::env::current_exe().context("locating the dsg executable")?,
    };
    let options = ExtensionOptions::with_app_dir(app_dir).with_program(program);

    let launch = load_server_extension(options)?;
    info!("dashboard for {} starting at {}", launch.app_dir.display(), launch.url);
    println!("{}", serde_json::to_string_pretty(&launch)?);
    Ok(())
}
