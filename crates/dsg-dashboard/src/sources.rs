//! Column-oriented data sources the charts are bound to.
//!
//! Timestamps are epoch milliseconds, the representation browser-side
//! datetime axes expect.

use chrono::NaiveDateTime;
use dsg_core::{from_web_mercator, CumulativePoint, MapPoint, SeriesPoint, Views};
use serde::{Deserialize, Serialize};

fn epoch_millis(date: NaiveDateTime) -> i64 {
    date.and_utc().timestamp_millis()
}

/// Instantaneous series, in GW.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstantSource {
    pub date: Vec<i64>,
    pub obs: Vec<f64>,
    pub pred: Vec<f64>,
}

impl From<&[SeriesPoint]> for InstantSource {
    fn from(points: &[SeriesPoint]) -> Self {
        Self {
            date: points.iter().map(|p| epoch_millis(p.date)).collect(),
            obs: points.iter().map(|p| p.observed.value()).collect(),
            pred: points.iter().map(|p| p.predicted.value()).collect(),
        }
    }
}

/// Cumulative series, in GWh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSource {
    pub date: Vec<i64>,
    pub cum_obs: Vec<f64>,
    pub cum_pred: Vec<f64>,
}

impl From<&[CumulativePoint]> for CumulativeSource {
    fn from(points: &[CumulativePoint]) -> Self {
        Self {
            date: points.iter().map(|p| epoch_millis(p.date)).collect(),
            cum_obs: points.iter().map(|p| p.observed.value()).collect(),
            cum_pred: points.iter().map(|p| p.predicted.value()).collect(),
        }
    }
}

/// Station markers: Web Mercator position and total observed GWh.
///
/// `lat`/`lon` are recovered from the projected position for tile layers
/// that place markers geographically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSource {
    pub name: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub obs: Vec<f64>,
}

impl From<&[MapPoint]> for MapSource {
    fn from(points: &[MapPoint]) -> Self {
        Self {
            name: points.iter().map(|p| p.station.clone()).collect(),
            x: points.iter().map(|p| p.position.x.value()).collect(),
            y: points.iter().map(|p| p.position.y.value()).collect(),
            lat: points
                .iter()
                .map(|p| from_web_mercator(p.position).0.value())
                .collect(),
            lon: points
                .iter()
                .map(|p| from_web_mercator(p.position).1.value())
                .collect(),
            obs: points.iter().map(|p| p.observed.value()).collect(),
        }
    }
}

/// The three sources of one dashboard document, always replaced together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundSources {
    pub instant: InstantSource,
    pub cumulative: CumulativeSource,
    pub map: MapSource,
}

impl From<&Views> for BoundSources {
    fn from(views: &Views) -> Self {
        Self {
            instant: InstantSource::from(views.series.instant.as_slice()),
            cumulative: CumulativeSource::from(views.series.cumulative.as_slice()),
            map: MapSource::from(views.map.as_slice()),
        }
    }
}
