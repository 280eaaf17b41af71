//! WGS84 (EPSG:4326) to Web Mercator (EPSG:3857) reprojection.
//!
//! Web Mercator treats the WGS84 ellipsoid as a sphere of the semi-major
//! axis radius, which is what tile providers expect:
//!
//! ```text
//! x = R · λ
//! y = R · ln(tan(π/4 + φ/2))
//! ```

use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::units::{Degrees, Meters};

/// WGS84 semi-major axis in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude bound of the square Web Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// A projected point in EPSG:3857.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorPoint {
    pub x: Meters,
    pub y: Meters,
}

/// Project a WGS84 coordinate. Latitudes past ±85.05° are clamped to the
/// edge of the projection.
pub fn to_web_mercator(latitude: Degrees, longitude: Degrees) -> MercatorPoint {
    let lat = Degrees(latitude.value().clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE));
    let x = EARTH_RADIUS_M * longitude.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    MercatorPoint {
        x: Meters(x),
        y: Meters(y),
    }
}

/// Inverse of [`to_web_mercator`], returning (latitude, longitude).
pub fn from_web_mercator(point: MercatorPoint) -> (Degrees, Degrees) {
    let lon = (point.x.value() / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (point.y.value() / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4)
        .to_degrees();
    (Degrees(lat), Degrees(lon))
}
