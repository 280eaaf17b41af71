//! Unit newtypes and the conversion constants of the view pipeline.
//!
//! The dataset stores power per square metre of panel per inhabitant (MW).
//! Multiplying by the efficiency coefficient and the panel surface gives MW,
//! which the charts show in GW (instantaneous) and GWh (cumulative).
//!
//! Readings arrive every 10 minutes, so summing readings and dividing by
//! [`SAMPLES_PER_HOUR`] turns a sum of GW samples into GWh.
//!
//! ```
//! use dsg_core::units::{Gigawatts, Megawatts};
//!
//! let p = Megawatts(75.0);
//! assert_eq!(p.to_gigawatts(), Gigawatts(0.075));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Readings per hour at the dataset's 10-minute cadence.
pub const SAMPLES_PER_HOUR: f64 = 6.0;

/// MW -> GW.
pub const GW_PER_MW: f64 = 1.0e-3;

/// Factor applied to a station's summed readings for the map: MW samples to GWh.
pub const MAP_ENERGY_FACTOR: f64 = GW_PER_MW / SAMPLES_PER_HOUR;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Power in megawatts (MW).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Power in gigawatts (GW).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Gigawatts(pub f64);

impl_unit_ops!(Gigawatts, "GW");

/// Energy in gigawatt-hours (GWh).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct GigawattHours(pub f64);

impl_unit_ops!(GigawattHours, "GWh");

impl Megawatts {
    #[inline]
    pub fn to_gigawatts(self) -> Gigawatts {
        Gigawatts(self.0 * GW_PER_MW)
    }
}

impl Gigawatts {
    /// Energy of one 10-minute sample at this power.
    #[inline]
    pub fn sample_energy(self) -> GigawattHours {
        GigawattHours(self.0 / SAMPLES_PER_HOUR)
    }
}

/// Angle in decimal degrees (WGS84 latitude/longitude).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "°");

impl Degrees {
    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Projected distance in metres (EPSG:3857 easting/northing).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(pub f64);

impl_unit_ops!(Meters, "m");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_factor_is_one_six_thousandth() {
        assert!((MAP_ENERGY_FACTOR - 1.0 / 6000.0).abs() < 1e-18);
    }

    #[test]
    fn megawatts_convert_to_gigawatts() {
        assert_eq!(Megawatts(150.0 * 0.5).to_gigawatts(), Gigawatts(0.075));
    }

    #[test]
    fn sample_energy_divides_by_cadence() {
        let e = Gigawatts(0.6).sample_energy();
        assert!((e.value() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn sum_of_units() {
        let total: Gigawatts = [Gigawatts(1.0), Gigawatts(2.5)].iter().sum();
        assert_eq!(total, Gigawatts(3.5));
        assert_eq!(format!("{}", total), "3.5000 GW");
    }
}
