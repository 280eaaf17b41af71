use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use dsg_core::{Dataset, Degrees, DsgError, DsgResult, Megawatts, Observation};
use serde::Deserialize;
use tracing::debug;

pub const NAME_COLUMN: &str = "Name";
pub const DATE_COLUMN: &str = "Date";
pub const LAT_COLUMN: &str = "lat";
pub const LON_COLUMN: &str = "lon";
pub const OBSERVED_COLUMN: &str = "Obs_pop(MW_m2_pop)";
pub const PREDICTED_COLUMN: &str = "Pred_pop(MW_m2_pop)";

const REQUIRED_COLUMNS: [&str; 6] = [
    NAME_COLUMN,
    DATE_COLUMN,
    LAT_COLUMN,
    LON_COLUMN,
    OBSERVED_COLUMN,
    PREDICTED_COLUMN,
];

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Date")]
    date: String,
    lat: f64,
    lon: f64,
    #[serde(rename = "Obs_pop(MW_m2_pop)")]
    observed: f64,
    #[serde(rename = "Pred_pop(MW_m2_pop)")]
    predicted: f64,
}

/// Load the solar prediction CSV at `path`.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let dataset =
        read_dataset(file).with_context(|| format!("reading dataset {}", path.display()))?;
    debug!(
        rows = dataset.len(),
        stations = dataset.stations().len(),
        "loaded {}",
        path.display()
    );
    Ok(dataset)
}

/// Parse a solar prediction CSV from any reader.
///
/// Columns other than the six the dashboard uses are ignored. The first
/// malformed row aborts the load with its line number.
pub fn read_dataset<R: Read>(reader: R) -> DsgResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|err| DsgError::Parse(format!("reading CSV header: {err}")))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(DsgError::Validation(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut observations = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| DsgError::Parse(err.to_string()))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: CsvRecord = record
            .deserialize(Some(&headers))
            .map_err(|err| DsgError::Parse(format!("line {line}: {err}")))?;
        let date = parse_timestamp(&row.date).map_err(|_| {
            DsgError::Parse(format!("line {line}: unrecognised timestamp '{}'", row.date))
        })?;

        observations.push(Observation {
            station: row.name,
            date,
            latitude: Degrees(row.lat),
            longitude: Degrees(row.lon),
            observed: Megawatts(row.observed),
            predicted: Megawatts(row.predicted),
        });
    }

    Dataset::new(observations)
}

/// Parse the `Date` column.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated variant, minute
/// precision, and RFC 3339 (offsets are dropped, keeping the wall-clock time).
pub fn parse_timestamp(raw: &str) -> DsgResult<NaiveDateTime> {
    let raw = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.naive_local())
        .map_err(|_| DsgError::Parse(format!("unrecognised timestamp '{raw}'")))
}
