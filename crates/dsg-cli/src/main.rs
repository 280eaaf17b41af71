use std::process::ExitCode;

use clap::Parser;
use dsg_cli::cli::{Cli, Commands};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::{completions, launch, serve, stations, views};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries command output (JSON, CSV, tables)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    let result = match &cli.command {
        Some(Commands::Serve {
            app_dir,
            addr,
            allow_websocket_origin,
        }) => serve::handle(app_dir, *addr, allow_websocket_origin),
        Some(Commands::Views {
            app_dir,
            station,
            efficiency,
            surface,
            format,
            out,
        }) => views::handle(&views::ViewsArgs {
            app_dir,
            station: station.as_deref(),
            efficiency: *efficiency,
            surface: *surface,
            format: *format,
            out: out.as_deref(),
        }),
        Some(Commands::Stations { app_dir }) => stations::handle(app_dir),
        Some(Commands::Launch { app_dir, program }) => launch::handle(app_dir, program.as_deref()),
        Some(Commands::Completions { shell, out }) => completions::handle(*shell, out.as_deref()),
        None => {
            info!("No subcommand provided. Use `dsg --help` for more information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}
