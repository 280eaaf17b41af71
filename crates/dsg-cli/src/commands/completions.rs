use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap_complete::{generate, Shell};
use dsg_io::write_to_path;

use dsg_cli::cli::build_cli_command;

/// Print the completion script for `shell`, or write it to `out`.
pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let Some(path) = out else {
        render(shell, &mut io::stdout().lock());
        return Ok(());
    };

    write_to_path(path, |mut file| {
        render(shell, &mut file);
        Ok(())
    })?;
    println!("Wrote {shell:?} completion to {}", path.display());
    Ok(())
}

fn render(shell: Shell, writer: &mut dyn Write) {
    let mut command = build_cli_command();
    let bin_name = command.get_name().to_string();
    generate(shell, &mut command, bin_name, writer);
}
