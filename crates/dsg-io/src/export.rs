use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use dsg_core::{MapPoint, SeriesViews};
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct SeriesRow {
    date: String,
    obs_gw: f64,
    pred_gw: f64,
    cum_obs_gwh: f64,
    cum_pred_gwh: f64,
}

#[derive(Serialize)]
struct MapRow<'a> {
    name: &'a str,
    x: f64,
    y: f64,
    obs_gwh: f64,
}

/// Write the instantaneous and cumulative series side by side, one row per timestamp.
pub fn write_series_csv<W: Write>(writer: W, series: &SeriesViews) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for (point, cum) in series.instant.iter().zip(&series.cumulative) {
        out.serialize(SeriesRow {
            date: point.date.format(DATE_FORMAT).to_string(),
            obs_gw: point.observed.value(),
            pred_gw: point.predicted.value(),
            cum_obs_gwh: cum.observed.value(),
            cum_pred_gwh: cum.predicted.value(),
        })
        .context("writing series row")?;
    }
    out.flush().context("flushing series CSV")?;
    Ok(())
}

/// Write one row per station marker.
pub fn write_map_csv<W: Write>(writer: W, points: &[MapPoint]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for point in points {
        out.serialize(MapRow {
            name: &point.station,
            x: point.position.x.value(),
            y: point.position.y.value(),
            obs_gwh: point.observed.value(),
        })
        .context("writing map row")?;
    }
    out.flush().context("flushing map CSV")?;
    Ok(())
}

/// Create `path` (and its parent directories) and hand it to `write`.
pub fn write_to_path<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write(file).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::read_dataset;
    use dsg_core::{Controls, Views};
    use tempfile::tempdir;

    const CSV: &str = "Name,Date,lat,lon,Obs_pop(MW_m2_pop),Pred_pop(MW_m2_pop)\n\
        Auckland,2018-01-01 12:00:00,-36.85,174.76,100,90\n\
        Wellington,2018-01-01 12:00:00,-41.28,174.77,50,60\n\
        Auckland,2018-01-01 12:10:00,-36.85,174.76,200,180\n";

    fn views() -> Views {
        let ds = read_dataset(CSV.as_bytes()).unwrap();
        Views::derive(&ds, &Controls::new("All", 1.0, 1.0)).unwrap()
    }

    #[test]
    fn series_csv_has_one_row_per_timestamp() {
        let mut buf = Vec::new();
        write_series_csv(&mut buf, &views().series).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,obs_gw,pred_gw,cum_obs_gwh,cum_pred_gwh");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2018-01-01 12:00:00,0.15,"));
    }

    #[test]
    fn map_csv_lists_every_station() {
        let mut buf = Vec::new();
        write_map_csv(&mut buf, &views().map).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("name,x,y,obs_gwh\n"));
        assert!(text.contains("Auckland,"));
        assert!(text.contains("Wellington,"));
    }

    #[test]
    fn write_to_path_creates_parents() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out/nested/map.csv");
        let map = views().map;
        write_to_path(&target, |file| write_map_csv(file, &map)).unwrap();
        assert!(target.exists());
    }
}
