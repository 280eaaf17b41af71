//! The immutable base dataset.
//!
//! A [`Dataset`] is built once from observation records and never mutated;
//! every chart view is derived from it on demand.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{DsgError, DsgResult};
use crate::units::{Degrees, Megawatts};

/// One reading of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station: String,
    pub date: NaiveDateTime,
    pub latitude: Degrees,
    pub longitude: Degrees,
    /// Measured output per m² of panel per inhabitant.
    pub observed: Megawatts,
    /// Model-estimated output per m² of panel per inhabitant.
    pub predicted: Megawatts,
}

/// A station and its WGS84 location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub latitude: Degrees,
    pub longitude: Degrees,
}

/// Observations sorted by date, plus the distinct stations in first-seen order.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    stations: Vec<Station>,
}

impl Dataset {
    /// Validate and index a set of observations.
    ///
    /// Fails when the set is empty, when a value is not finite, or when a
    /// station is reported at two different locations.
    pub fn new(mut observations: Vec<Observation>) -> DsgResult<Self> {
        if observations.is_empty() {
            return Err(DsgError::Validation(
                "dataset contains no observations".to_string(),
            ));
        }

        let mut stations: Vec<Station> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for obs in &observations {
            if !obs.observed.is_finite() || !obs.predicted.is_finite() {
                return Err(DsgError::Validation(format!(
                    "non-finite reading for {} at {}",
                    obs.station, obs.date
                )));
            }
            match seen.get(&obs.station) {
                Some(&idx) => {
                    let known = &stations[idx];
                    if known.latitude != obs.latitude || known.longitude != obs.longitude {
                        return Err(DsgError::Validation(format!(
                            "station {} reported at ({}, {}) and ({}, {})",
                            obs.station,
                            known.latitude.value(),
                            known.longitude.value(),
                            obs.latitude.value(),
                            obs.longitude.value()
                        )));
                    }
                }
                None => {
                    seen.insert(obs.station.clone(), stations.len());
                    stations.push(Station {
                        name: obs.station.clone(),
                        latitude: obs.latitude,
                        longitude: obs.longitude,
                    });
                }
            }
        }

        // stable: rows sharing a date keep their file order
        observations.sort_by_key(|obs| obs.date);

        Ok(Self {
            observations,
            stations,
        })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station_names(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First and last timestamps covered by the dataset.
    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.observations.first()?.date;
        let last = self.observations.last()?.date;
        Some((first, last))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    pub fn obs(station: &str, date: NaiveDateTime, observed: f64, predicted: f64) -> Observation {
        let (lat, lon) = match station {
            "Auckland" => (-36.85, 174.76),
            "Wellington" => (-41.28, 174.77),
            "Christchurch" => (-43.53, 172.63),
            _ => (-40.0, 175.0),
        };
        Observation {
            station: station.to_string(),
            date,
            latitude: Degrees(lat),
            longitude: Degrees(lon),
            observed: Megawatts(observed),
            predicted: Megawatts(predicted),
        }
    }

    /// Three stations over three 10-minute steps.
    pub fn sample() -> Dataset {
        let mut rows = Vec::new();
        for (i, (hour, minute)) in [(12, 0), (12, 10), (12, 20)].into_iter().enumerate() {
            let k = i as f64 + 1.0;
            rows.push(obs("Auckland", at(hour, minute), 100.0 * k, 90.0 * k));
            rows.push(obs("Wellington", at(hour, minute), 50.0 * k, 60.0 * k));
            rows.push(obs("Christchurch", at(hour, minute), 20.0 * k, 25.0 * k));
        }
        Dataset::new(rows).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn stations_keep_first_seen_order() {
        let ds = sample();
        let names: Vec<&str> = ds.station_names().collect();
        assert_eq!(names, vec!["Auckland", "Wellington", "Christchurch"]);
        assert_eq!(ds.len(), 9);
    }

    #[test]
    fn observations_are_sorted_by_date() {
        let ds = Dataset::new(vec![
            obs("Auckland", at(13, 0), 1.0, 1.0),
            obs("Auckland", at(12, 0), 2.0, 2.0),
        ])
        .unwrap();
        assert_eq!(ds.observations()[0].date, at(12, 0));
        assert_eq!(ds.date_range(), Some((at(12, 0), at(13, 0))));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            Dataset::new(Vec::new()),
            Err(DsgError::Validation(_))
        ));
    }

    #[test]
    fn moving_station_is_rejected() {
        let mut moved = obs("Auckland", at(12, 10), 1.0, 1.0);
        moved.latitude = Degrees(-37.0);
        let err = Dataset::new(vec![obs("Auckland", at(12, 0), 1.0, 1.0), moved]).unwrap_err();
        assert!(err.to_string().contains("Auckland"));
    }

    #[test]
    fn non_finite_reading_is_rejected() {
        let err = Dataset::new(vec![obs("Auckland", at(12, 0), f64::NAN, 1.0)]).unwrap_err();
        assert!(matches!(err, DsgError::Validation(_)));
    }
}
