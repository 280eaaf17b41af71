//! Derived chart views.
//!
//! Every view is a pure function of the immutable [`Dataset`] and the current
//! [`Controls`]; nothing is cached between calls.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::controls::{Controls, StationFilter};
use crate::dataset::Dataset;
use crate::error::{DsgError, DsgResult};
use crate::projection::{to_web_mercator, MercatorPoint};
use crate::units::{GigawattHours, Gigawatts, Megawatts, MAP_ENERGY_FACTOR};

/// Instantaneous production at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDateTime,
    pub observed: Gigawatts,
    pub predicted: Gigawatts,
}

/// Production accumulated up to and including one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDateTime,
    pub observed: GigawattHours,
    pub predicted: GigawattHours,
}

/// A station marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub station: String,
    pub position: MercatorPoint,
    /// Observed production over the whole dataset.
    pub observed: GigawattHours,
}

/// Instantaneous and cumulative series for one station filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesViews {
    pub instant: Vec<SeriesPoint>,
    pub cumulative: Vec<CumulativePoint>,
}

/// Everything the charts are bound to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub series: SeriesViews,
    pub map: Vec<MapPoint>,
}

impl Views {
    /// Validate the controls and derive all three views.
    pub fn derive(dataset: &Dataset, controls: &Controls) -> DsgResult<Self> {
        Ok(Self {
            series: select_series(dataset, controls)?,
            map: map_points(dataset, controls)?,
        })
    }
}

/// Filter and aggregate the time series.
///
/// Readings of the selected stations are summed per timestamp, scaled by
/// efficiency × surface and converted to GW. The cumulative series is the
/// running sum of that, divided by the sampling cadence to give GWh.
///
/// A filter naming no known station is an error.
pub fn select_series(dataset: &Dataset, controls: &Controls) -> DsgResult<SeriesViews> {
    controls.validate()?;
    if let StationFilter::Contains(needle) = &controls.station {
        if !dataset.station_names().any(|name| controls.station.matches(name)) {
            return Err(DsgError::UnknownStation(needle.clone()));
        }
    }

    let mut per_date: BTreeMap<NaiveDateTime, (f64, f64)> = BTreeMap::new();
    for obs in dataset
        .observations()
        .iter()
        .filter(|obs| controls.station.matches(&obs.station))
    {
        let entry = per_date.entry(obs.date).or_insert((0.0, 0.0));
        entry.0 += obs.observed.value();
        entry.1 += obs.predicted.value();
    }

    let scale = controls.scale();
    let mut instant = Vec::with_capacity(per_date.len());
    let mut cumulative = Vec::with_capacity(per_date.len());
    let mut running_obs = Gigawatts::default();
    let mut running_pred = Gigawatts::default();

    for (date, (observed, predicted)) in per_date {
        let observed = (Megawatts(observed) * scale).to_gigawatts();
        let predicted = (Megawatts(predicted) * scale).to_gigawatts();
        running_obs = running_obs + observed;
        running_pred = running_pred + predicted;

        instant.push(SeriesPoint {
            date,
            observed,
            predicted,
        });
        cumulative.push(CumulativePoint {
            date,
            observed: running_obs.sample_energy(),
            predicted: running_pred.sample_energy(),
        });
    }

    Ok(SeriesViews {
        instant,
        cumulative,
    })
}

/// One marker per station with its total observed production.
///
/// The map always covers every station; the station filter only drives the
/// time series.
pub fn map_points(dataset: &Dataset, controls: &Controls) -> DsgResult<Vec<MapPoint>> {
    controls.validate()?;

    let mut totals: HashMap<&str, f64> = HashMap::new();
    for obs in dataset.observations() {
        *totals.entry(obs.station.as_str()).or_insert(0.0) += obs.observed.value();
    }

    let scale = controls.scale();
    let points = dataset
        .stations()
        .iter()
        .map(|station| {
            let total = totals.get(station.name.as_str()).copied().unwrap_or(0.0);
            MapPoint {
                station: station.name.clone(),
                position: to_web_mercator(station.latitude, station.longitude),
                observed: GigawattHours((Megawatts(total) * scale * MAP_ENERGY_FACTOR).value()),
            }
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{at, obs, sample};

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn two_station_scenario() {
        let ds = Dataset::new(vec![
            obs("A", at(12, 0), 100.0, 0.0),
            obs("B", at(12, 0), 50.0, 0.0),
        ])
        .unwrap();

        let all = select_series(&ds, &Controls::new("All", 0.5, 1.0)).unwrap();
        assert_eq!(all.instant.len(), 1);
        assert!(close(all.instant[0].observed.value(), 0.075));

        let a = select_series(&ds, &Controls::new("A", 0.5, 1.0)).unwrap();
        assert!(close(a.instant[0].observed.value(), 0.05));
    }

    #[test]
    fn cumulative_is_running_sum_over_cadence() {
        let ds = sample();
        for filter in ["All", "Auckland", "Wellington", "Christchurch"] {
            let views = select_series(&ds, &Controls::new(filter, 0.5, 1.0)).unwrap();
            let mut acc_obs = 0.0;
            let mut acc_pred = 0.0;
            for (point, cum) in views.instant.iter().zip(&views.cumulative) {
                assert_eq!(point.date, cum.date);
                acc_obs += point.observed.value();
                acc_pred += point.predicted.value();
                assert!(close(cum.observed.value(), acc_obs / 6.0));
                assert!(close(cum.predicted.value(), acc_pred / 6.0));
            }
        }
    }

    #[test]
    fn all_equals_sum_of_stations() {
        let ds = sample();
        let controls = Controls::new("All", 0.35, 2.5);
        let all = select_series(&ds, &controls).unwrap();

        let per_station: Vec<SeriesViews> = ds
            .station_names()
            .map(|name| {
                let mut c = controls.clone();
                c.station = StationFilter::from(name);
                select_series(&ds, &c).unwrap()
            })
            .collect();

        for (i, point) in all.instant.iter().enumerate() {
            let obs: f64 = per_station.iter().map(|s| s.instant[i].observed.value()).sum();
            let pred: f64 = per_station.iter().map(|s| s.instant[i].predicted.value()).sum();
            assert!(close(point.observed.value(), obs));
            assert!(close(point.predicted.value(), pred));
        }
    }

    #[test]
    fn doubling_coefficient_doubles_everything() {
        let ds = sample();
        let base = Views::derive(&ds, &Controls::new("All", 0.25, 1.5)).unwrap();
        let doubled = Views::derive(&ds, &Controls::new("All", 0.5, 1.5)).unwrap();

        for (a, b) in base.series.instant.iter().zip(&doubled.series.instant) {
            assert!(close(b.observed.value(), 2.0 * a.observed.value()));
            assert!(close(b.predicted.value(), 2.0 * a.predicted.value()));
        }
        for (a, b) in base.series.cumulative.iter().zip(&doubled.series.cumulative) {
            assert!(close(b.observed.value(), 2.0 * a.observed.value()));
        }
        for (a, b) in base.map.iter().zip(&doubled.map) {
            assert!(close(b.observed.value(), 2.0 * a.observed.value()));
        }
    }

    #[test]
    fn doubling_surface_doubles_everything() {
        let ds = sample();
        let base = Views::derive(&ds, &Controls::new("Wellington", 0.5, 1.0)).unwrap();
        let doubled = Views::derive(&ds, &Controls::new("Wellington", 0.5, 2.0)).unwrap();

        for (a, b) in base.series.instant.iter().zip(&doubled.series.instant) {
            assert!(close(b.observed.value(), 2.0 * a.observed.value()));
        }
        for (a, b) in base.series.cumulative.iter().zip(&doubled.series.cumulative) {
            assert!(close(b.predicted.value(), 2.0 * a.predicted.value()));
        }
        for (a, b) in base.map.iter().zip(&doubled.map) {
            assert!(close(b.observed.value(), 2.0 * a.observed.value()));
        }
    }

    #[test]
    fn substring_filter_sums_matching_stations() {
        let ds = sample();
        // "ch" matches only Christchurch
        let christchurch = select_series(&ds, &Controls::new("ch", 1.0, 1.0)).unwrap();
        assert!(close(christchurch.instant[0].observed.value(), 0.02));

        let both = select_series(&ds, &Controls::new("l", 1.0, 1.0)).unwrap();
        // Auckland + Wellington
        assert!(close(both.instant[0].observed.value(), 0.15));
        assert_eq!(both.instant.len(), 3);
    }

    #[test]
    fn unknown_station_is_an_error() {
        let ds = sample();
        let err = select_series(&ds, &Controls::new("Dunedin", 0.5, 1.0)).unwrap_err();
        assert!(matches!(err, DsgError::UnknownStation(name) if name == "Dunedin"));
    }

    #[test]
    fn invalid_controls_are_rejected() {
        let ds = sample();
        assert!(matches!(
            Views::derive(&ds, &Controls::new("All", 2.0, 1.0)),
            Err(DsgError::OutOfRange { .. })
        ));
    }

    #[test]
    fn map_totals_use_six_thousandth_factor() {
        let ds = sample();
        let map = map_points(&ds, &Controls::new("Wellington", 0.5, 1.0)).unwrap();
        assert_eq!(map.len(), 3);

        let auckland = &map[0];
        assert_eq!(auckland.station, "Auckland");
        // 100 + 200 + 300 readings
        assert!(close(auckland.observed.value(), 600.0 * 0.5 / 6000.0));
        assert_eq!(
            auckland.position,
            to_web_mercator(ds.stations()[0].latitude, ds.stations()[0].longitude)
        );
    }

    #[test]
    fn zero_efficiency_flattens_views() {
        let ds = sample();
        let views = Views::derive(&ds, &Controls::new("All", 0.0, 3.0)).unwrap();
        assert!(views.series.instant.iter().all(|p| p.observed.value() == 0.0));
        assert!(views.map.iter().all(|p| p.observed.value() == 0.0));
    }
}
