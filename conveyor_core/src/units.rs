//! # Unit Types
//!
//! Type-safe wrappers for the handful of unit conversions the formula layer
//! performs. These provide compile-time safety against unit confusion while
//! remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - The DIN/ISO 5048 method works in a consistent SI set (m, kg, s, N, W)
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! Parameter and result structs carry plain `f64` fields with unit-suffixed
//! names (`belt_speed_m_s`, `driving_force_n`); the wrappers below are used
//! where a conversion actually happens: angles supplied in degrees consumed
//! in radians, throughput in t/h consumed in kg/s, and power reported in
//! both watts and kilowatts.
//!
//! ## Example
//!
//! ```rust
//! use conveyor_core::units::{Degrees, Radians, TonnesPerHour, KgPerSecond};
//!
//! let wrap: Radians = Degrees(180.0).into();
//! assert!((wrap.0 - std::f64::consts::PI).abs() < 1e-12);
//!
//! let feed: KgPerSecond = TonnesPerHour(2300.0).into();
//! assert!((feed.0 - 638.888).abs() < 1e-2);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Angles
// ============================================================================

/// Angle in degrees (the unit used in parameter files)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians (the unit used by the trigonometric formulas)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

// ============================================================================
// Mass flow
// ============================================================================

/// Throughput in tonnes per hour (the unit design briefs quote)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonnesPerHour(pub f64);

/// Mass flow in kilograms per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerSecond(pub f64);

impl From<TonnesPerHour> for KgPerSecond {
    fn from(tph: TonnesPerHour) -> Self {
        KgPerSecond(tph.0 * 1000.0 / 3600.0)
    }
}

impl From<KgPerSecond> for TonnesPerHour {
    fn from(kgs: KgPerSecond) -> Self {
        TonnesPerHour(kgs.0 * 3600.0 / 1000.0)
    }
}

// ============================================================================
// Power
// ============================================================================

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Power in kilowatts (motor sizes are quoted in kW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

impl From<Watts> for Kilowatts {
    fn from(w: Watts) -> Self {
        Kilowatts(w.0 / 1000.0)
    }
}

impl From<Kilowatts> for Watts {
    fn from(kw: Kilowatts) -> Self {
        Watts(kw.0 * 1000.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
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

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Degrees);
impl_arithmetic!(Radians);
impl_arithmetic!(TonnesPerHour);
impl_arithmetic!(KgPerSecond);
impl_arithmetic!(Watts);
impl_arithmetic!(Kilowatts);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        let rad: Radians = Degrees(45.0).into();
        assert!((rad.0 - std::f64::consts::FRAC_PI_4).abs() < 1e-12);

        let back: Degrees = rad.into();
        assert!((back.0 - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_throughput_conversion() {
        // 3600 t/h is exactly 1000 kg/s
        let kgs: KgPerSecond = TonnesPerHour(3600.0).into();
        assert_eq!(kgs.0, 1000.0);
    }

    #[test]
    fn test_power_conversion() {
        let kw: Kilowatts = Watts(68_930.0).into();
        assert!((kw.0 - 68.93).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Watts(10.0);
        let b = Watts(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let deg = Degrees(20.0);
        let json = serde_json::to_string(&deg).unwrap();
        assert_eq!(json, "20.0");

        let roundtrip: Degrees = serde_json::from_str(&json).unwrap();
        assert_eq!(deg, roundtrip);
    }
}
