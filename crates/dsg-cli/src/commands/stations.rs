use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use dsg_core::to_web_mercator;
use dsg_dashboard::DashboardConfig;
use tabwriter::TabWriter;

pub fn handle(app_dir: &Path) -> Result<()> {
    let config = DashboardConfig::load_app_dir(app_dir)?;
    let dataset = dsg_io::load_dataset(config.data_path(app_dir))?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "STATION\tLAT\tLON\tX (m)\tY (m)")?;
    for station in dataset.stations() {
        let position = to_web_mercator(station.latitude, station.longitude);
        writeln!(
            writer,
            "{}\t{:.4}\t{:.4}\t{:.1}\t{:.1}",
            station.name,
            station.latitude.value(),
            station.longitude.value(),
            position.x.value(),
            position.y.value()
        )?;
    }
    writer.flush()?;
    Ok(())
}
