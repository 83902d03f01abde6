//! # Resistance Model
//!
//! Each named motion resistance of the DIN/ISO 5048 method, as a pure
//! function returning newtons. Mass densities come from
//! [`crate::calculations::capacity`]; the orchestrator sums the results
//! into the net driving force.
//!
//! The wrap resistance between belt and pulleys exists in two fidelities:
//! [`belt_wrap_resistance`] is the simplified empirical form usable before
//! any tension is known, and [`precise_wrap_resistance`] is the
//! higher-fidelity form used in the refinement pass once the drive-pulley
//! tensions have been derived.

use serde::{Deserialize, Serialize};

use crate::calculations::STANDARD_GRAVITY;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Degrees, Radians};

/// Main resistance F_h (N): rolling and flexing losses along the whole
/// conveyor.
///
/// `f·L·g·(q_ro + q_ru + (2·q_b + q_m)·cos δ)`
///
/// # Arguments
///
/// * `material_mass_kg_m` - q_m, material linear mass (kg/m)
/// * `belt_mass_kg_m` - q_b, belt linear mass (kg/m)
/// * `carry_idler_mass_kg_m` - q_ro (kg/m)
/// * `return_idler_mass_kg_m` - q_ru (kg/m)
/// * `centre_length_m` - L (m)
/// * `install_angle_deg` - δ, conveyor incline (deg)
/// * `friction_factor` - f, artificial friction factor
pub fn main_resistance(
    material_mass_kg_m: f64,
    belt_mass_kg_m: f64,
    carry_idler_mass_kg_m: f64,
    return_idler_mass_kg_m: f64,
    centre_length_m: f64,
    install_angle_deg: f64,
    friction_factor: f64,
) -> f64 {
    let delta: Radians = Degrees(install_angle_deg).into();
    friction_factor
        * centre_length_m
        * STANDARD_GRAVITY
        * (carry_idler_mass_kg_m
            + return_idler_mass_kg_m
            + (2.0 * belt_mass_kg_m + material_mass_kg_m) * delta.0.cos())
}

/// Gravity (slope) resistance F_st (N): `q_m·H·g`.
///
/// Zero for a flat conveyor (H = 0); negative for a declining one.
pub fn gravity_resistance(material_mass_kg_m: f64, lift_m: f64) -> f64 {
    material_mass_kg_m * lift_m * STANDARD_GRAVITY
}

/// Inertial and frictional resistance F_ba (N): the force needed to
/// accelerate the in-feed material stream to belt speed.
///
/// `Q_v·ρ·1000·(v − v₀)`
pub fn inertial_friction_resistance(
    flow_m3_s: f64,
    density_t_m3: f64,
    belt_speed_m_s: f64,
    feed_speed_m_s: f64,
) -> f64 {
    flow_m3_s * density_t_m3 * 1000.0 * (belt_speed_m_s - feed_speed_m_s)
}

/// Friction between the material and the skirtplates over the acceleration
/// zone, F_f (N).
///
/// The minimum acceleration length is `l_b = (v² − v₀²)/(2·g·μ₁)`; the
/// friction force over it scales with the square of the flow rate and
/// inversely with the square of the mean speed and the skirtplate width.
///
/// # Errors
///
/// `InvalidInput` if `mu1` or `skirt_width_m` is zero or negative, or if
/// both speeds are zero (the mean speed divides the result).
pub fn acceleration_skirtplate_resistance(
    flow_m3_s: f64,
    density_t_m3: f64,
    belt_speed_m_s: f64,
    feed_speed_m_s: f64,
    skirt_width_m: f64,
    mu1: f64,
    mu2: f64,
) -> CalcResult<f64> {
    if mu1 <= 0.0 {
        return Err(CalcError::invalid_input(
            "mu1",
            mu1.to_string(),
            "Material/belt friction coefficient must be positive",
        ));
    }
    if skirt_width_m <= 0.0 {
        return Err(CalcError::invalid_input(
            "skirt_width_m",
            skirt_width_m.to_string(),
            "Skirtplate width must be positive",
        ));
    }
    let mean_speed = (belt_speed_m_s + feed_speed_m_s) / 2.0;
    if mean_speed <= 0.0 {
        return Err(CalcError::invalid_input(
            "belt_speed_m_s",
            mean_speed.to_string(),
            "Mean of belt and feed speed must be positive",
        ));
    }

    let accel_length_m = (belt_speed_m_s.powi(2) - feed_speed_m_s.powi(2))
        / (2.0 * STANDARD_GRAVITY * mu1);

    Ok(
        mu2 * flow_m3_s.powi(2) * density_t_m3 * 1000.0 * STANDARD_GRAVITY * accel_length_m
            / (mean_speed.powi(2) * skirt_width_m.powi(2)),
    )
}

/// Simplified wrap resistance between the belt and one pulley, F_1t (N).
///
/// `300·B·sin(α)` with `α = max(180 − wrap_angle, 90)` in degrees: the
/// sine term is capped at 1 once the wrap exceeds 90°, reflecting the
/// simplified approximation for belt/lagging/bearing losses.
pub fn belt_wrap_resistance(belt_width_m: f64, wrap_angle_deg: f64) -> f64 {
    let alpha = Degrees((180.0 - wrap_angle_deg).max(90.0));
    let alpha_rad: Radians = alpha.into();
    300.0 * belt_width_m * alpha_rad.0.sin()
}

/// Inputs for [`secondary_resistance`].
///
/// The two override fields substitute caller-supplied precise wrap
/// resistances for the simplified formula (refinement pass). They are
/// explicit optionals: `Some(0.0)` is a legitimate override of zero,
/// `None` means "compute the simplified value here".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondaryResistanceInput {
    pub flow_m3_s: f64,
    pub density_t_m3: f64,
    pub belt_speed_m_s: f64,
    pub feed_speed_m_s: f64,
    pub belt_width_m: f64,
    pub skirt_width_m: f64,
    pub mu_material_belt: f64,
    pub mu_material_skirt: f64,
    pub head_wrap_angle_deg: f64,
    pub tail_wrap_angle_deg: f64,
    pub head_wrap_override_n: Option<f64>,
    pub tail_wrap_override_n: Option<f64>,
}

/// Secondary resistance F_n (N): inertial/frictional + acceleration-zone
/// skirtplate friction + head and tail wrap resistances.
pub fn secondary_resistance(input: &SecondaryResistanceInput) -> CalcResult<f64> {
    let f_ba = inertial_friction_resistance(
        input.flow_m3_s,
        input.density_t_m3,
        input.belt_speed_m_s,
        input.feed_speed_m_s,
    );
    let f_f = acceleration_skirtplate_resistance(
        input.flow_m3_s,
        input.density_t_m3,
        input.belt_speed_m_s,
        input.feed_speed_m_s,
        input.skirt_width_m,
        input.mu_material_belt,
        input.mu_material_skirt,
    )?;

    let head_wrap = input
        .head_wrap_override_n
        .unwrap_or_else(|| belt_wrap_resistance(input.belt_width_m, input.head_wrap_angle_deg));
    let tail_wrap = input
        .tail_wrap_override_n
        .unwrap_or_else(|| belt_wrap_resistance(input.belt_width_m, input.tail_wrap_angle_deg));

    Ok(f_ba + f_f + head_wrap + tail_wrap)
}

/// Friction between the material and the skirtplates over the full skirted
/// length, F_gl (N).
///
/// Distinct from [`acceleration_skirtplate_resistance`], which applies
/// only over the acceleration length l_b.
///
/// # Errors
///
/// `InvalidInput` if `belt_speed_m_s` or `skirt_width_m` is zero or
/// negative.
pub fn skirtplate_friction_resistance(
    flow_m3_s: f64,
    density_t_m3: f64,
    belt_speed_m_s: f64,
    skirt_length_m: f64,
    skirt_width_m: f64,
    mu2: f64,
) -> CalcResult<f64> {
    if belt_speed_m_s <= 0.0 {
        return Err(CalcError::invalid_input(
            "belt_speed_m_s",
            belt_speed_m_s.to_string(),
            "Belt speed must be positive",
        ));
    }
    if skirt_width_m <= 0.0 {
        return Err(CalcError::invalid_input(
            "skirt_width_m",
            skirt_width_m.to_string(),
            "Skirtplate width must be positive",
        ));
    }

    Ok(
        mu2 * flow_m3_s.powi(2) * density_t_m3 * 1000.0 * STANDARD_GRAVITY * skirt_length_m
            / (belt_speed_m_s.powi(2) * skirt_width_m.powi(2)),
    )
}

/// Friction resistance of the belt cleaners, F_rc (N):
/// `width·thickness·pressure·count·μ₃`.
pub fn belt_cleaner_resistance(
    cleaner_width_m: f64,
    cleaner_thickness_m: f64,
    pressure_n_m2: f64,
    count: u32,
    mu3: f64,
) -> f64 {
    cleaner_width_m * cleaner_thickness_m * pressure_n_m2 * f64::from(count) * mu3
}

/// Concentrated (special) resistance F_s (N): skirtplate friction over the
/// skirted length plus belt-cleaner friction.
///
/// Idler-tilt and discharge-plough resistances are features this conveyor
/// configuration does not have; they are kept as explicit zero terms so the
/// sum reads the same as the standard's formula.
#[allow(clippy::too_many_arguments)]
pub fn concentrated_resistance(
    flow_m3_s: f64,
    density_t_m3: f64,
    belt_speed_m_s: f64,
    skirt_length_m: f64,
    skirt_width_m: f64,
    cleaner_width_m: f64,
    cleaner_thickness_m: f64,
    cleaner_pressure_n_m2: f64,
    cleaner_count: u32,
    mu2: f64,
    mu3: f64,
) -> CalcResult<f64> {
    let idler_tilt = 0.0;
    let discharge_plough = 0.0;

    let f_gl = skirtplate_friction_resistance(
        flow_m3_s,
        density_t_m3,
        belt_speed_m_s,
        skirt_length_m,
        skirt_width_m,
        mu2,
    )?;
    let f_rc = belt_cleaner_resistance(
        cleaner_width_m,
        cleaner_thickness_m,
        cleaner_pressure_n_m2,
        cleaner_count,
        mu3,
    );

    Ok(idler_tilt + f_gl + f_rc + discharge_plough)
}

/// Higher-fidelity wrap resistance at one pulley, F_1t (N), usable once
/// the belt tensions are known.
///
/// Sum of a belt-flexing term `9·B·(140 + 0.01·F̄/B)·d/D` evaluated at the
/// average tension `F̄ = (T₁ + T₂)/2`, and a pulley-bearing term
/// `0.005·(d₀/D)·(T₁ + T₂ + m_p·g)`.
///
/// # Errors
///
/// `InvalidInput` if `pulley_diameter_m` or `belt_width_m` is zero or
/// negative.
pub fn precise_wrap_resistance(
    belt_width_m: f64,
    belt_thickness_m: f64,
    pulley_diameter_m: f64,
    bearing_diameter_m: f64,
    pulley_mass_kg: f64,
    tight_tension_n: f64,
    slack_tension_n: f64,
) -> CalcResult<f64> {
    if pulley_diameter_m <= 0.0 {
        return Err(CalcError::invalid_input(
            "pulley_diameter_m",
            pulley_diameter_m.to_string(),
            "Pulley diameter must be positive",
        ));
    }
    if belt_width_m <= 0.0 {
        return Err(CalcError::invalid_input(
            "belt_width_m",
            belt_width_m.to_string(),
            "Belt width must be positive",
        ));
    }

    let average_tension = (tight_tension_n + slack_tension_n) / 2.0;
    let flexing = 9.0
        * belt_width_m
        * (140.0 + 0.01 * average_tension / belt_width_m)
        * (belt_thickness_m / pulley_diameter_m);
    let bearing = 0.005
        * (bearing_diameter_m / pulley_diameter_m)
        * (tight_tension_n + slack_tension_n + pulley_mass_kg * STANDARD_GRAVITY);

    Ok(flexing + bearing)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference flat coal conveyor figures
    const Q_M: f64 = 133.1;
    const Q_B: f64 = 16.44;
    const Q_RO: f64 = 12.92;
    const Q_RU: f64 = 4.40;
    const LENGTH: f64 = 143.0;
    const FLOW: f64 = 0.751_633_986_928_104_6; // 2300 t/h of 0.85 t/m³ coal
    const DENSITY: f64 = 0.85;
    const V: f64 = 4.8;

    #[test]
    fn test_main_resistance() {
        let f_h = main_resistance(Q_M, Q_B, Q_RO, Q_RU, LENGTH, 0.0, 0.02);
        assert!((f_h - 5142.73).abs() < 0.25);
    }

    #[test]
    fn test_main_resistance_incline_reduces_normal_load() {
        let flat = main_resistance(Q_M, Q_B, Q_RO, Q_RU, LENGTH, 0.0, 0.02);
        let inclined = main_resistance(Q_M, Q_B, Q_RO, Q_RU, LENGTH, 10.0, 0.02);
        assert!(inclined < flat);
    }

    #[test]
    fn test_gravity_resistance_flat_is_zero() {
        assert_eq!(gravity_resistance(Q_M, 0.0), 0.0);
    }

    #[test]
    fn test_gravity_resistance_lift() {
        // 133.1 kg/m lifted 10 m
        let f_st = gravity_resistance(133.1, 10.0);
        assert!((f_st - 13057.11).abs() < 0.01);
    }

    #[test]
    fn test_inertial_friction_resistance() {
        let f_ba = inertial_friction_resistance(FLOW, DENSITY, V, 0.0);
        assert!((f_ba - 3066.67).abs() < 0.01);
    }

    #[test]
    fn test_acceleration_skirtplate_resistance() {
        let f_f =
            acceleration_skirtplate_resistance(FLOW, DENSITY, V, 0.0, 0.634, 0.6, 0.6).unwrap();
        assert!((f_f - 2389.37).abs() < 0.01);
    }

    #[test]
    fn test_acceleration_skirtplate_rejects_zero_mu1() {
        assert!(acceleration_skirtplate_resistance(FLOW, DENSITY, V, 0.0, 0.634, 0.0, 0.6).is_err());
    }

    #[test]
    fn test_belt_wrap_resistance_at_full_wrap() {
        // 180° wrap: α caps at 90°, sin = 1
        let f_1t = belt_wrap_resistance(1.2, 180.0);
        assert!((f_1t - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_belt_wrap_resistance_caps_below_90() {
        // Any wrap ≥ 90° gives the capped value 300·B
        assert_eq!(
            belt_wrap_resistance(1.2, 90.0),
            belt_wrap_resistance(1.2, 180.0)
        );
        // Below 90° of wrap the sine term comes off the cap
        assert!(belt_wrap_resistance(1.2, 45.0) < belt_wrap_resistance(1.2, 90.0));
    }

    #[test]
    fn test_belt_wrap_resistance_monotone_in_wrap_angle() {
        // Decreasing the wrap from 180° toward 90° must not decrease the
        // resistance
        let mut previous = belt_wrap_resistance(1.2, 180.0);
        for wrap in [170.0, 150.0, 130.0, 110.0, 90.0] {
            let current = belt_wrap_resistance(1.2, wrap);
            assert!(current >= previous - 1e-12);
            previous = current;
        }
    }

    fn secondary_input() -> SecondaryResistanceInput {
        SecondaryResistanceInput {
            flow_m3_s: FLOW,
            density_t_m3: DENSITY,
            belt_speed_m_s: V,
            feed_speed_m_s: 0.0,
            belt_width_m: 1.2,
            skirt_width_m: 0.634,
            mu_material_belt: 0.6,
            mu_material_skirt: 0.6,
            head_wrap_angle_deg: 180.0,
            tail_wrap_angle_deg: 180.0,
            head_wrap_override_n: None,
            tail_wrap_override_n: None,
        }
    }

    #[test]
    fn test_secondary_resistance_simplified() {
        let f_n = secondary_resistance(&secondary_input()).unwrap();
        // f_ba + f_f + 2 × 360
        assert!((f_n - 6176.04).abs() < 0.01);
    }

    #[test]
    fn test_secondary_resistance_with_overrides() {
        let mut input = secondary_input();
        input.head_wrap_override_n = Some(153.0);
        input.tail_wrap_override_n = Some(141.0);
        let f_n = secondary_resistance(&input).unwrap();
        let simplified = secondary_resistance(&secondary_input()).unwrap();
        assert!((simplified - f_n - (720.0 - 294.0)).abs() < 1e-9);
    }

    #[test]
    fn test_secondary_resistance_zero_override_is_honored() {
        let mut input = secondary_input();
        input.head_wrap_override_n = Some(0.0);
        input.tail_wrap_override_n = Some(0.0);
        let f_n = secondary_resistance(&input).unwrap();
        let simplified = secondary_resistance(&secondary_input()).unwrap();
        assert!((simplified - f_n - 720.0).abs() < 1e-9);
    }

    #[test]
    fn test_skirtplate_friction_resistance() {
        let f_gl = skirtplate_friction_resistance(FLOW, DENSITY, V, 4.0, 0.634, 0.6).unwrap();
        assert!((f_gl - 1220.82).abs() < 0.01);
    }

    #[test]
    fn test_skirtplate_friction_rejects_zero_width() {
        assert!(skirtplate_friction_resistance(FLOW, DENSITY, V, 4.0, 0.0, 0.6).is_err());
    }

    #[test]
    fn test_belt_cleaner_resistance() {
        let f_rc = belt_cleaner_resistance(1.2, 0.008, 30_000.0, 4, 0.6);
        assert!((f_rc - 691.2).abs() < 1e-9);
    }

    #[test]
    fn test_concentrated_resistance() {
        let f_s = concentrated_resistance(
            FLOW, DENSITY, V, 4.0, 0.634, 1.2, 0.008, 30_000.0, 4, 0.6, 0.6,
        )
        .unwrap();
        // f_gl + f_rc with zero idler-tilt and plough terms
        assert!((f_s - 1912.02).abs() < 0.01);
    }

    #[test]
    fn test_precise_wrap_resistance() {
        // Sag-governed tensions from the reference refinement pass
        let t1 = 35_235.87;
        let t2 = 22_005.08;
        let drive = precise_wrap_resistance(1.2, 0.02, 1.2, 0.25, 2400.0, t1, t2).unwrap();
        assert!((drive - 152.28).abs() < 0.01);

        let tail = precise_wrap_resistance(1.2, 0.02, 1.0, 0.18, 1200.0, t1, t2).unwrap();
        assert!((tail - 143.87).abs() < 0.01);
    }

    #[test]
    fn test_precise_wrap_rejects_zero_diameter() {
        assert!(precise_wrap_resistance(1.2, 0.02, 0.0, 0.25, 2400.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_precise_differs_from_simplified() {
        // The refinement must actually change the wrap term
        let t1 = 35_235.87;
        let t2 = 22_005.08;
        let precise = precise_wrap_resistance(1.2, 0.02, 1.2, 0.25, 2400.0, t1, t2).unwrap();
        let simplified = belt_wrap_resistance(1.2, 180.0);
        assert!((precise - simplified).abs() > 1.0);
    }
}
