//! # dsg-core: distributed solar generation views
//!
//! Data model and view pipeline behind the New Zealand distributed solar
//! dashboard.
//!
//! ## Design
//!
//! - [`Dataset`]: immutable, validated observations (one row per station per
//!   10-minute timestamp).
//! - [`Controls`]: the station selector and the two sliders.
//! - [`Views`]: instantaneous series (GW), cumulative series (GWh) and map
//!   markers (GWh, Web Mercator), derived as a pure function of the two.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dsg_core::*;
//! # fn rows() -> Vec<Observation> { unimplemented!() }
//!
//! let dataset = Dataset::new(rows())?;
//! let views = Views::derive(&dataset, &Controls::new("Wellington", 0.5, 1.0))?;
//! for point in &views.series.instant {
//!     println!("{} {}", point.date, point.observed);
//! }
//! # Ok::<(), DsgError>(())
//! ```

pub mod controls;
pub mod dataset;
pub mod error;
pub mod projection;
pub mod units;
pub mod views;

pub use controls::{
    ControlChange, Controls, SliderRange, StationFilter, ALL_STATIONS, EFFICIENCY_RANGE,
    SURFACE_RANGE,
};
pub use dataset::{Dataset, Observation, Station};
pub use error::{DsgError, DsgResult};
pub use projection::{from_web_mercator, to_web_mercator, MercatorPoint};
pub use units::{Degrees, GigawattHours, Gigawatts, Megawatts, Meters};
pub use views::{map_points, select_series, CumulativePoint, MapPoint, SeriesPoint, SeriesViews, Views};
