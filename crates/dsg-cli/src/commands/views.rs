use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dsg_cli::cli::ViewFormat;
use dsg_core::{Controls, StationFilter, Views};
use dsg_dashboard::DashboardConfig;
use dsg_io::{write_map_csv, write_series_csv, write_to_path};
use tracing::info;

pub struct ViewsArgs<'a> {
    pub app_dir: &'a Path,
    pub station: Option<&'a str>,
    pub efficiency: Option<f64>,
    pub surface: Option<f64>,
    pub format: ViewFormat,
    pub out: Option<&'a Path>,
}

/// Derive the views for the configured controls, with flag overrides.
pub fn handle(args: &ViewsArgs<'_>) -> Result<()> {
    let config = DashboardConfig::load_app_dir(args.app_dir)?;
    let dataset = dsg_io::load_dataset(config.data_path(args.app_dir))?;

    let defaults = config.controls.to_controls()?;
    let controls = Controls {
        station: args
            .station
            .map(StationFilter::from)
            .unwrap_or(defaults.station),
        efficiency: args.efficiency.unwrap_or(defaults.efficiency),
        surface: args.surface.unwrap_or(defaults.surface),
    };
    info!(
        "deriving views for station={} efficiency={} surface={}",
        controls.station, controls.efficiency, controls.surface
    );
    let views = Views::derive(&dataset, &controls)
        .with_context(|| format!("deriving views for station '{}'", controls.station))?;

    match args.out {
        Some(path) => {
            write_to_path(path, |file| write_views(file, &views, args.format))?;
            info!("wrote {:?} views to {}", args.format, path.display());
            Ok(())
        }
        None => write_views(io::stdout().lock(), &views, args.format),
    }
}

fn write_views<W: Write>(mut writer: W, views: &Views, format: ViewFormat) -> Result<()> {
    match format {
        ViewFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, views)?;
            writeln!(writer)?;
            Ok(())
        }
        ViewFormat::SeriesCsv => write_series_csv(writer, &views.series),
        ViewFormat::MapCsv => write_map_csv(writer, &views.map),
    }
}
