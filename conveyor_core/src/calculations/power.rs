//! # Power Model
//!
//! Converts the net peripheral driving force into the drive motor power
//! requirement, accounting for the mechanical losses in the drive train.

use crate::errors::{CalcError, CalcResult};

/// Drive motor power requirement P_M (W).
///
/// `P_A = F_u·v` is the operating power at the drive pulley; dividing by
/// the fluid coupling and gearbox efficiencies gives the motor power.
///
/// # Errors
///
/// `InvalidInput` if either efficiency is zero or negative.
pub fn motor_power(
    driving_force_n: f64,
    belt_speed_m_s: f64,
    coupling_efficiency: f64,
    gearbox_efficiency: f64,
) -> CalcResult<f64> {
    if coupling_efficiency <= 0.0 {
        return Err(CalcError::invalid_input(
            "coupling_efficiency",
            coupling_efficiency.to_string(),
            "Drive efficiency must be positive",
        ));
    }
    if gearbox_efficiency <= 0.0 {
        return Err(CalcError::invalid_input(
            "gearbox_efficiency",
            gearbox_efficiency.to_string(),
            "Drive efficiency must be positive",
        ));
    }

    let pulley_power_w = driving_force_n * belt_speed_m_s;
    Ok(pulley_power_w / (coupling_efficiency * gearbox_efficiency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Kilowatts, Watts};

    #[test]
    fn test_motor_power() {
        // Refined reference scenario: 12 807 N at 4.8 m/s through a
        // 0.95 coupling and 0.97 gearbox
        let p_m = motor_power(12_806.94, 4.8, 0.95, 0.97).unwrap();
        let kw: Kilowatts = Watts(p_m).into();
        assert!((kw.0 - 66.71).abs() < 0.005);
    }

    #[test]
    fn test_lossless_drive_is_pulley_power() {
        let p_m = motor_power(1_000.0, 2.0, 1.0, 1.0).unwrap();
        assert_eq!(p_m, 2_000.0);
    }

    #[test]
    fn test_zero_efficiency_is_error() {
        assert!(motor_power(1_000.0, 2.0, 0.0, 0.97).is_err());
        assert!(motor_power(1_000.0, 2.0, 0.95, 0.0).is_err());
    }
}
