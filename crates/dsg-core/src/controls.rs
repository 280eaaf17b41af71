//! The three user-adjustable dashboard controls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DsgError, DsgResult};

/// Label the station selector uses for "every station".
pub const ALL_STATIONS: &str = "All";

/// Bounds and step of a slider control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub default: f64,
}

impl SliderRange {
    pub fn check(&self, control: &'static str, value: f64) -> DsgResult<f64> {
        if value.is_finite() && value >= self.start && value <= self.end {
            Ok(value)
        } else {
            Err(DsgError::OutOfRange {
                control,
                value,
                min: self.start,
                max: self.end,
            })
        }
    }
}

pub const EFFICIENCY_RANGE: SliderRange = SliderRange {
    start: 0.0,
    end: 1.0,
    step: 0.05,
    default: 0.5,
};

/// Panel surface per inhabitant, in m².
pub const SURFACE_RANGE: SliderRange = SliderRange {
    start: 0.0,
    end: 5.0,
    step: 0.5,
    default: 1.0,
};

/// Which stations feed the time series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StationFilter {
    #[default]
    All,
    /// Keep stations whose name contains this text.
    Contains(String),
}

impl StationFilter {
    pub fn matches(&self, station: &str) -> bool {
        match self {
            StationFilter::All => true,
            StationFilter::Contains(needle) => station.contains(needle.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, StationFilter::All)
    }
}

impl From<String> for StationFilter {
    fn from(value: String) -> Self {
        if value == ALL_STATIONS {
            StationFilter::All
        } else {
            StationFilter::Contains(value)
        }
    }
}

impl From<&str> for StationFilter {
    fn from(value: &str) -> Self {
        StationFilter::from(value.to_string())
    }
}

impl From<StationFilter> for String {
    fn from(value: StationFilter) -> Self {
        match value {
            StationFilter::All => ALL_STATIONS.to_string(),
            StationFilter::Contains(name) => name,
        }
    }
}

impl fmt::Display for StationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationFilter::All => f.write_str(ALL_STATIONS),
            StationFilter::Contains(name) => f.write_str(name),
        }
    }
}

/// Current value of every control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub station: StationFilter,
    /// Panel conversion efficiency.
    pub efficiency: f64,
    /// Panel surface per inhabitant (m²).
    pub surface: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            station: StationFilter::All,
            efficiency: EFFICIENCY_RANGE.default,
            surface: SURFACE_RANGE.default,
        }
    }
}

impl Controls {
    pub fn new(station: impl Into<StationFilter>, efficiency: f64, surface: f64) -> Self {
        Self {
            station: station.into(),
            efficiency,
            surface,
        }
    }

    pub fn validate(&self) -> DsgResult<()> {
        EFFICIENCY_RANGE.check("efficiency", self.efficiency)?;
        SURFACE_RANGE.check("surface", self.surface)?;
        Ok(())
    }

    /// Multiplier applied to every reading: efficiency × surface.
    pub fn scale(&self) -> f64 {
        self.efficiency * self.surface
    }

    /// Return a copy with one control changed, validating the new value.
    pub fn with_change(&self, change: &ControlChange) -> DsgResult<Self> {
        let mut next = self.clone();
        match change {
            ControlChange::Station(filter) => next.station = filter.clone(),
            ControlChange::Efficiency(value) => {
                next.efficiency = EFFICIENCY_RANGE.check("efficiency", *value)?
            }
            ControlChange::Surface(value) => {
                next.surface = SURFACE_RANGE.check("surface", *value)?
            }
        }
        Ok(next)
    }
}

/// A single widget value change, as sent by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", content = "value", rename_all = "snake_case")]
pub enum ControlChange {
    Station(StationFilter),
    Efficiency(f64),
    Surface(f64),
}
