use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dsg", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the dashboard over HTTP and WebSocket
    Serve {
        /// App directory holding dsg.toml and data/
        #[arg(default_value = "viz-small", value_hint = ValueHint::DirPath)]
        app_dir: PathBuf,
        /// Bind address (overrides [server].bind)
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// Origin allowed to open a WebSocket session; `*` allows any (repeatable)
        #[arg(long = "allow-websocket-origin", value_name = "HOST[:PORT]")]
        allow_websocket_origin: Vec<String>,
    },
    /// Derive the chart views once and print them
    Views {
        #[arg(default_value = "viz-small", value_hint = ValueHint::DirPath)]
        app_dir: PathBuf,
        /// Station filter ("All" or a substring of station names)
        #[arg(long)]
        station: Option<String>,
        /// Efficiency coefficient in [0, 1]
        #[arg(long)]
        efficiency: Option<f64>,
        /// Panel surface per inhabitant (m2) in [0, 5]
        #[arg(long)]
        surface: Option<f64>,
        #[arg(long, value_enum, default_value_t = ViewFormat::Json)]
        format: ViewFormat,
        /// Write output to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// List the stations of an app directory's dataset
    Stations {
        #[arg(default_value = "viz-small", value_hint = ValueHint::DirPath)]
        app_dir: PathBuf,
    },
    /// Start `dsg serve` as a detached process, as the notebook hook does
    Launch {
        #[arg(default_value = "viz-small", value_hint = ValueHint::DirPath)]
        app_dir: PathBuf,
        /// Executable to spawn (defaults to this binary)
        #[arg(long, value_hint = ValueHint::ExecutablePath)]
        program: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFormat {
    /// Series and map points as one JSON document
    Json,
    /// Instantaneous and cumulative series as CSV
    SeriesCsv,
    /// Map points as CSV
    MapCsv,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
