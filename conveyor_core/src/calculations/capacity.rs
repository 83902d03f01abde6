//! # Capacity Model
//!
//! Converts belt speed, material density, and trough geometry into carried
//! volume/mass per unit time and per unit length.
//!
//! ## Assumptions
//!
//! - Three-roll carry idler set: the material cross-section is the sum of
//!   an upper wedge governed by the surcharge angle and a lower trapezoid
//!   governed by the side-roll angle
//! - Angles are supplied in degrees and are only meaningful below 90°
//!   (the surcharge tangent diverges at 90°)
//!
//! ## Example
//!
//! ```rust
//! use conveyor_core::calculations::capacity::{cross_sectional_area, volumetric_flow};
//!
//! let area = cross_sectional_area(0.436, 1.03, 45.0, 20.0);
//! assert!((area - 0.180).abs() < 1e-3);
//!
//! let flow = volumetric_flow(area, 4.8);
//! assert!((flow - 0.865).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Degrees, KgPerSecond, Radians, TonnesPerHour};

/// Mass flow onto the belt, in one of the two forms a design brief quotes.
///
/// The two variants are mutually exclusive by construction; a legitimate
/// zero in either form is an explicit value, never "unset".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum MassFlow {
    /// Mass throughput q (t/h)
    Throughput { tonnes_per_hour: f64 },
    /// Volumetric flow rate Q_v (m³/s) and material density ρ (t/m³)
    Volumetric { flow_m3_s: f64, density_t_m3: f64 },
}

/// Cross-sectional area of material on the belt (m²).
///
/// Sum of the upper surcharge wedge and the lower trapezoid formed by the
/// three-roll set.
///
/// # Arguments
///
/// * `roll_width_m` - Width of the centre roll l3 (m)
/// * `material_width_m` - Width of the material stream at maximum loading b (m)
/// * `install_angle_deg` - Installed angle of the side rolls (deg, < 90)
/// * `surcharge_angle_deg` - Surcharge angle of the material (deg, < 90)
pub fn cross_sectional_area(
    roll_width_m: f64,
    material_width_m: f64,
    install_angle_deg: f64,
    surcharge_angle_deg: f64,
) -> f64 {
    upper_section(
        roll_width_m,
        material_width_m,
        install_angle_deg,
        surcharge_angle_deg,
    ) + lower_section(roll_width_m, material_width_m, install_angle_deg)
}

/// Upper wedge: (1/6)·(l3 + (b − l3)·cos(ia))²·tan(sa)
fn upper_section(
    roll_width_m: f64,
    material_width_m: f64,
    install_angle_deg: f64,
    surcharge_angle_deg: f64,
) -> f64 {
    let ia: Radians = Degrees(install_angle_deg).into();
    let sa: Radians = Degrees(surcharge_angle_deg).into();
    let top_width = roll_width_m + (material_width_m - roll_width_m) * ia.0.cos();
    (1.0 / 6.0) * top_width.powi(2) * sa.0.tan()
}

/// Lower trapezoid: (l3 + ((b − l3)/2)·cos(ia)) · ((b − l3)/2)·sin(ia)
fn lower_section(roll_width_m: f64, material_width_m: f64, install_angle_deg: f64) -> f64 {
    let ia: Radians = Degrees(install_angle_deg).into();
    let half_wing = (material_width_m - roll_width_m) / 2.0;
    (roll_width_m + half_wing * ia.0.cos()) * (half_wing * ia.0.sin())
}

/// Volumetric flow rate carried by the belt (m³/s) = area × speed.
pub fn volumetric_flow(area_m2: f64, belt_speed_m_s: f64) -> f64 {
    area_m2 * belt_speed_m_s
}

/// Mass of material per metre of belt (kg/m).
///
/// Accepts either a throughput in t/h or a volumetric flow rate with the
/// material density; the unit conversions (t/h → kg/s, t/m³ → kg/m³) are
/// embedded here.
///
/// # Errors
///
/// `InvalidInput` if `belt_speed_m_s` is zero or negative (the quantity is
/// mass flow divided by speed).
pub fn mass_per_length(belt_speed_m_s: f64, flow: MassFlow) -> CalcResult<f64> {
    if belt_speed_m_s <= 0.0 {
        return Err(CalcError::invalid_input(
            "belt_speed_m_s",
            belt_speed_m_s.to_string(),
            "Belt speed must be positive",
        ));
    }

    let q_m = match flow {
        MassFlow::Throughput { tonnes_per_hour } => {
            let feed: KgPerSecond = TonnesPerHour(tonnes_per_hour).into();
            feed.0 / belt_speed_m_s
        }
        MassFlow::Volumetric {
            flow_m3_s,
            density_t_m3,
        } => flow_m3_s * density_t_m3 * 1000.0 / belt_speed_m_s,
    };

    Ok(q_m)
}

/// Linear mass density contributed by an idler run (kg/m) = mass / spacing.
///
/// # Errors
///
/// `InvalidInput` if `spacing_m` is zero or negative.
pub fn idler_mass_per_length(spacing_m: f64, idler_mass_kg: f64) -> CalcResult<f64> {
    if spacing_m <= 0.0 {
        return Err(CalcError::invalid_input(
            "spacing_m",
            spacing_m.to_string(),
            "Idler spacing must be positive",
        ));
    }
    Ok(idler_mass_kg / spacing_m)
}

/// Volumetric flow rate (m³/s) implied by a mass throughput and density.
///
/// Inverse conversion for when only the throughput is known but a flow rate
/// is needed downstream.
///
/// # Errors
///
/// `InvalidInput` if `density_t_m3` is zero or negative.
pub fn volume_from_throughput(tonnes_per_hour: f64, density_t_m3: f64) -> CalcResult<f64> {
    if density_t_m3 <= 0.0 {
        return Err(CalcError::invalid_input(
            "density_t_m3",
            density_t_m3.to_string(),
            "Material density must be positive",
        ));
    }
    let feed: KgPerSecond = TonnesPerHour(tonnes_per_hour).into();
    Ok(feed.0 / (density_t_m3 * 1000.0))
}
