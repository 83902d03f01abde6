//! # Design Orchestrator
//!
//! Sequences the capacity, resistance, tension, and power models into the
//! standard design pass and the optional ISO refinement pass.
//!
//! A [`DesignRun`] has two states. Construction (`solve`) runs the full
//! standard pass and captures every intermediate in a [`DesignSolution`]
//! snapshot. Calling [`DesignRun::refine`] derives the drive- and
//! tail-pulley tensions from the phase-1 driving force, substitutes the
//! precise wrap resistances for the simplified ones, and recomputes
//! secondary resistance, driving force, and power into a separate
//! [`RefinedSolution`] snapshot. Both snapshots are retained so callers can
//! compare phases; neither is mutated after it is produced.
//!
//! Refinement is one-way and idempotent: it always re-derives from the same
//! phase-1 driving force, so calling it twice yields the same result.
//!
//! ## Example
//!
//! ```rust,no_run
//! use conveyor_core::calculations::design::DesignRun;
//! use conveyor_core::parameters::DesignParameters;
//!
//! # fn params() -> DesignParameters { unimplemented!() }
//! let mut run = DesignRun::solve(&params(), 2300.0).unwrap();
//! println!("F_u = {:.2} N", run.initial.driving_force_n);
//!
//! let refined = run.refine().unwrap();
//! println!("refined F_u = {:.2} N", refined.driving_force_n);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::capacity::{
    cross_sectional_area, idler_mass_per_length, mass_per_length, volume_from_throughput,
    volumetric_flow, MassFlow,
};
use crate::calculations::power::motor_power;
use crate::calculations::resistances::{
    acceleration_skirtplate_resistance, belt_cleaner_resistance, belt_wrap_resistance,
    concentrated_resistance, gravity_resistance, inertial_friction_resistance, main_resistance,
    precise_wrap_resistance, secondary_resistance, skirtplate_friction_resistance,
    SecondaryResistanceInput,
};
use crate::calculations::tension::{belt_sag_tension, min_transmission_tension};
use crate::calculations::{SagTensions, TransmissionCheck};
use crate::errors::CalcResult;
use crate::parameters::DesignParameters;
use crate::units::{Degrees, Kilowatts, Radians, Watts};

/// Decimal places used when comparing capstan tension ratios.
const TENSION_PRECISION_DIGITS: u32 = 3;

/// Which calculation phases have been run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignState {
    /// Standard pass only (simplified wrap resistances)
    Initial,
    /// ISO refinement pass has been applied
    Refined,
}

/// Every scalar produced by the standard design pass.
///
/// Append-only during the run; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSolution {
    /// Target throughput q this run was solved for (t/h)
    pub throughput_t_h: f64,

    // === Capacity ===
    /// Material cross-section on the belt s (m²)
    pub cross_section_m2: f64,
    /// Volumetric capacity of the cross-section q_vt (m³/s)
    pub capacity_flow_m3_s: f64,
    /// Mass per metre at full cross-section q_mt (kg/m)
    pub capacity_mass_kg_m: f64,
    /// Mass per metre at the target throughput q_m (kg/m)
    pub material_mass_kg_m: f64,
    /// Carry idler linear mass q_ro (kg/m)
    pub carry_idler_mass_kg_m: f64,
    /// Return idler linear mass q_ru (kg/m)
    pub return_idler_mass_kg_m: f64,
    /// Volumetric flow at the target throughput Q_v (m³/s)
    pub flow_m3_s: f64,

    // === Resistances ===
    /// Lift height implied by the installation angle H (m)
    pub lift_m: f64,
    /// Main resistance F_h (N)
    pub main_resistance_n: f64,
    /// Gravity resistance F_st (N)
    pub gravity_resistance_n: f64,
    /// Inertial/frictional in-feed resistance F_ba (N)
    pub inertial_resistance_n: f64,
    /// Acceleration-zone skirtplate resistance F_f (N)
    pub acceleration_skirt_resistance_n: f64,
    /// Simplified wrap resistance per pulley F_1t (N)
    pub simplified_wrap_resistance_n: f64,
    /// Secondary resistance F_n (N)
    pub secondary_resistance_n: f64,
    /// Full-length skirtplate friction F_gl (N)
    pub skirt_friction_resistance_n: f64,
    /// Belt cleaner resistance F_rc (N)
    pub cleaner_resistance_n: f64,
    /// Concentrated (special) resistance F_s (N)
    pub concentrated_resistance_n: f64,

    // === Tensions and drive ===
    /// Sag-limited minimum tensions per strand
    pub sag_tensions: SagTensions,
    /// Net peripheral driving force F_u (N)
    pub driving_force_n: f64,
    /// Drive motor power P_M (W)
    pub motor_power_w: f64,
}

impl DesignSolution {
    /// Motor power in kilowatts, the unit motors are quoted in.
    pub fn motor_power_kw(&self) -> f64 {
        let kw: Kilowatts = Watts(self.motor_power_w).into();
        kw.0
    }
}

/// Scalars produced by the ISO refinement pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedSolution {
    /// Capstan check at the drive pulley (slack tension auto-derived)
    pub drive_check: TransmissionCheck,
    /// Capstan check at the tail pulley (floor = carry-side sag tension)
    pub tail_check: TransmissionCheck,
    /// Precise wrap resistance at the drive pulley (N)
    pub drive_wrap_resistance_n: f64,
    /// Precise wrap resistance at the tail pulley (N)
    pub tail_wrap_resistance_n: f64,
    /// Secondary resistance recomputed with precise wrap values (N)
    pub secondary_resistance_n: f64,
    /// Recomputed net driving force (N)
    pub driving_force_n: f64,
    /// Recomputed drive motor power (W)
    pub motor_power_w: f64,
}

impl RefinedSolution {
    /// Motor power in kilowatts.
    pub fn motor_power_kw(&self) -> f64 {
        let kw: Kilowatts = Watts(self.motor_power_w).into();
        kw.0
    }
}

/// A single conveyor design calculation: parameters in, two result
/// snapshots out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignRun {
    params: DesignParameters,

    /// Standard-pass snapshot, computed at construction
    pub initial: DesignSolution,

    /// Refinement-pass snapshot, present after [`DesignRun::refine`]
    pub refined: Option<RefinedSolution>,
}

impl DesignRun {
    /// Run the standard design pass for a target throughput.
    ///
    /// Validates the parameter record first, then evaluates the fixed
    /// construction sequence: capacity, linear masses, each resistance,
    /// sag tensions, net driving force, motor power.
    pub fn solve(params: &DesignParameters, throughput_t_h: f64) -> CalcResult<Self> {
        params.validate()?;

        let op = &params.operation;
        let mat = &params.material;
        let coef = &params.coefficients;
        let belt = &params.belt;
        let carry = &params.idler.carry;
        let ret = &params.idler.r#return;
        let skirt = &params.skirtplates;
        let cleaners = &params.belt_cleaners;

        // Capacity of the loaded cross-section (not tied to the target
        // throughput)
        let cross_section_m2 = cross_sectional_area(
            carry.roll_width_m,
            belt.max_material_width_m,
            carry.install_angle_deg,
            mat.surcharge_angle_deg,
        );
        let capacity_flow_m3_s = volumetric_flow(cross_section_m2, op.belt_speed_m_s);
        let capacity_mass_kg_m = mass_per_length(
            op.belt_speed_m_s,
            MassFlow::Volumetric {
                flow_m3_s: capacity_flow_m3_s,
                density_t_m3: mat.density_t_m3,
            },
        )?;

        // Linear masses at the operating point
        let material_mass_kg_m = mass_per_length(
            op.belt_speed_m_s,
            MassFlow::Throughput {
                tonnes_per_hour: throughput_t_h,
            },
        )?;
        let carry_idler_mass_kg_m = idler_mass_per_length(carry.spacing_m, carry.mass_kg)?;
        let return_idler_mass_kg_m = idler_mass_per_length(ret.spacing_m, ret.mass_kg)?;

        // Main and gravity resistances
        let main_resistance_n = main_resistance(
            material_mass_kg_m,
            belt.linear_mass_kg_m,
            carry_idler_mass_kg_m,
            return_idler_mass_kg_m,
            op.centre_length_m,
            op.install_angle_deg,
            coef.artificial_friction,
        );
        let install: Radians = Degrees(op.install_angle_deg).into();
        let lift_m = op.centre_length_m * install.0.sin();
        let gravity_resistance_n = gravity_resistance(material_mass_kg_m, lift_m);

        // Secondary resistances (phase 1: simplified wrap formula)
        let flow_m3_s = volume_from_throughput(throughput_t_h, mat.density_t_m3)?;
        let inertial_resistance_n = inertial_friction_resistance(
            flow_m3_s,
            mat.density_t_m3,
            op.belt_speed_m_s,
            op.feed_speed_m_s,
        );
        let acceleration_skirt_resistance_n = acceleration_skirtplate_resistance(
            flow_m3_s,
            mat.density_t_m3,
            op.belt_speed_m_s,
            op.feed_speed_m_s,
            skirt.width_m,
            coef.mu_material_belt,
            coef.mu_material_skirt,
        )?;
        let simplified_wrap_resistance_n =
            belt_wrap_resistance(belt.width_m, op.wrap_angle_deg);
        let secondary_resistance_n = secondary_resistance(&SecondaryResistanceInput {
            flow_m3_s,
            density_t_m3: mat.density_t_m3,
            belt_speed_m_s: op.belt_speed_m_s,
            feed_speed_m_s: op.feed_speed_m_s,
            belt_width_m: belt.width_m,
            skirt_width_m: skirt.width_m,
            mu_material_belt: coef.mu_material_belt,
            mu_material_skirt: coef.mu_material_skirt,
            head_wrap_angle_deg: op.wrap_angle_deg,
            tail_wrap_angle_deg: op.wrap_angle_deg,
            head_wrap_override_n: None,
            tail_wrap_override_n: None,
        })?;

        // Concentrated resistances and sag tensions
        let skirt_friction_resistance_n = skirtplate_friction_resistance(
            flow_m3_s,
            mat.density_t_m3,
            op.belt_speed_m_s,
            skirt.length_m,
            skirt.width_m,
            coef.mu_material_skirt,
        )?;
        let sag_tensions = belt_sag_tension(
            material_mass_kg_m,
            belt.linear_mass_kg_m,
            carry.spacing_m,
            ret.spacing_m,
            carry.allowable_sag_m,
            ret.allowable_sag_m,
        )?;
        let cleaner_resistance_n = belt_cleaner_resistance(
            cleaners.width_m,
            cleaners.thickness_m,
            cleaners.pressure_n_m2,
            cleaners.count,
            coef.mu_belt_cleaner,
        );
        let concentrated_resistance_n = concentrated_resistance(
            flow_m3_s,
            mat.density_t_m3,
            op.belt_speed_m_s,
            skirt.length_m,
            skirt.width_m,
            cleaners.width_m,
            cleaners.thickness_m,
            cleaners.pressure_n_m2,
            cleaners.count,
            coef.mu_material_skirt,
            coef.mu_belt_cleaner,
        )?;

        // Net driving force and motor power
        let driving_force_n = main_resistance_n
            + secondary_resistance_n
            + concentrated_resistance_n
            + gravity_resistance_n;
        let motor_power_w = motor_power(
            driving_force_n,
            op.belt_speed_m_s,
            coef.coupling_efficiency,
            coef.gearbox_efficiency,
        )?;

        Ok(DesignRun {
            params: params.clone(),
            initial: DesignSolution {
                throughput_t_h,
                cross_section_m2,
                capacity_flow_m3_s,
                capacity_mass_kg_m,
                material_mass_kg_m,
                carry_idler_mass_kg_m,
                return_idler_mass_kg_m,
                flow_m3_s,
                lift_m,
                main_resistance_n,
                gravity_resistance_n,
                inertial_resistance_n,
                acceleration_skirt_resistance_n,
                simplified_wrap_resistance_n,
                secondary_resistance_n,
                skirt_friction_resistance_n,
                cleaner_resistance_n,
                concentrated_resistance_n,
                sag_tensions,
                driving_force_n,
                motor_power_w,
            },
            refined: None,
        })
    }

    /// Run the ISO refinement pass.
    ///
    /// Derives the minimum transmission tensions from the phase-1 driving
    /// force, evaluates the precise wrap resistance at both pulleys, and
    /// recomputes secondary resistance, driving force, and motor power.
    ///
    /// Idempotent: always re-derives from the phase-1 snapshot, so a second
    /// call reproduces the same refined values.
    pub fn refine(&mut self) -> CalcResult<&RefinedSolution> {
        let op = &self.params.operation;
        let mat = &self.params.material;
        let coef = &self.params.coefficients;
        let belt = &self.params.belt;
        let skirt = &self.params.skirtplates;
        let initial = &self.initial;

        // Slip-transmission minimum at the drive pulley; sag-governed floor
        // at the tail pulley (the carry strand arrives there loaded)
        let drive_check = min_transmission_tension(
            initial.driving_force_n,
            op.wrap_angle_deg,
            coef.mu_belt_pulley,
            TENSION_PRECISION_DIGITS,
            None,
        )?;
        let tail_check = min_transmission_tension(
            initial.driving_force_n,
            op.wrap_angle_deg,
            coef.mu_belt_pulley,
            TENSION_PRECISION_DIGITS,
            Some(initial.sag_tensions.carry_min_n),
        )?;

        // Both wrap terms are evaluated with the sag-governed tail tensions,
        // which bound the belt tension across the installation
        let drive_wrap_resistance_n = precise_wrap_resistance(
            belt.width_m,
            belt.thickness_m,
            self.params.pulley.drive.diameter_m,
            self.params.pulley.drive.bearing_diameter_m,
            self.params.pulley.drive.mass_kg,
            tail_check.tight_n,
            tail_check.slack_n,
        )?;
        let tail_wrap_resistance_n = precise_wrap_resistance(
            belt.width_m,
            belt.thickness_m,
            self.params.pulley.tail.diameter_m,
            self.params.pulley.tail.bearing_diameter_m,
            self.params.pulley.tail.mass_kg,
            tail_check.tight_n,
            tail_check.slack_n,
        )?;

        // Secondary resistance (phase 2) with the precise wrap values
        // substituted for the simplified ones
        let secondary_resistance_n = secondary_resistance(&SecondaryResistanceInput {
            flow_m3_s: initial.flow_m3_s,
            density_t_m3: mat.density_t_m3,
            belt_speed_m_s: op.belt_speed_m_s,
            feed_speed_m_s: op.feed_speed_m_s,
            belt_width_m: belt.width_m,
            skirt_width_m: skirt.width_m,
            mu_material_belt: coef.mu_material_belt,
            mu_material_skirt: coef.mu_material_skirt,
            head_wrap_angle_deg: op.wrap_angle_deg,
            tail_wrap_angle_deg: op.wrap_angle_deg,
            head_wrap_override_n: Some(drive_wrap_resistance_n),
            tail_wrap_override_n: Some(tail_wrap_resistance_n),
        })?;

        let driving_force_n = initial.main_resistance_n
            + secondary_resistance_n
            + initial.concentrated_resistance_n
            + initial.gravity_resistance_n;
        let motor_power_w = motor_power(
            driving_force_n,
            op.belt_speed_m_s,
            coef.coupling_efficiency,
            coef.gearbox_efficiency,
        )?;

        Ok(self.refined.insert(RefinedSolution {
            drive_check,
            tail_check,
            drive_wrap_resistance_n,
            tail_wrap_resistance_n,
            secondary_resistance_n,
            driving_force_n,
            motor_power_w,
        }))
    }

    /// Which phase the run has reached.
    pub fn state(&self) -> DesignState {
        if self.refined.is_some() {
            DesignState::Refined
        } else {
            DesignState::Initial
        }
    }

    /// The parameter record this run was solved from.
    pub fn parameters(&self) -> &DesignParameters {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::flat_coal_conveyor;

    const Q: f64 = 2300.0;

    fn solved() -> DesignRun {
        DesignRun::solve(&flat_coal_conveyor(), Q).unwrap()
    }

    #[test]
    fn test_cross_sectional_capacity() {
        let run = solved();
        assert!((run.initial.cross_section_m2 - 0.180).abs() < 1e-3);
        assert!((run.initial.capacity_flow_m3_s - 0.865).abs() < 1e-3);
        assert!((run.initial.capacity_mass_kg_m - 153.0).abs() < 0.5);
    }

    #[test]
    fn test_linear_masses() {
        let run = solved();
        assert!((run.initial.material_mass_kg_m - 133.1).abs() < 0.05);
        assert!((run.initial.carry_idler_mass_kg_m - 12.92).abs() < 0.005);
        assert!((run.initial.return_idler_mass_kg_m - 4.40).abs() < 0.005);
    }

    #[test]
    fn test_standard_pass_resistances() {
        let run = solved();
        let r = &run.initial;

        assert!((r.main_resistance_n - 5142.73).abs() < 0.01);
        assert_eq!(r.gravity_resistance_n, 0.0); // flat conveyor
        assert!((r.inertial_resistance_n - 3066.67).abs() < 0.01);
        assert!((r.acceleration_skirt_resistance_n - 2389.37).abs() < 0.01);
        assert!((r.simplified_wrap_resistance_n - 360.0).abs() < 1e-9);
        assert!((r.secondary_resistance_n - 6176.04).abs() < 0.01);
        assert!((r.skirt_friction_resistance_n - 1220.82).abs() < 0.01);
        assert!((r.cleaner_resistance_n - 691.2).abs() < 0.01);
        assert!((r.concentrated_resistance_n - 1912.02).abs() < 0.01);

        // Secondary is the sum of its parts (two simplified wrap terms)
        let parts = r.inertial_resistance_n
            + r.acceleration_skirt_resistance_n
            + 2.0 * r.simplified_wrap_resistance_n;
        assert!((r.secondary_resistance_n - parts).abs() < 1e-9);
    }

    #[test]
    fn test_standard_pass_tensions_force_and_power() {
        let run = solved();
        let r = &run.initial;

        assert!((r.sag_tensions.carry_min_n - 22_005.08).abs() < 0.01);
        assert!((r.sag_tensions.return_min_n - 3_023.93).abs() < 0.01);

        // F_u = F_h + F_n + F_s + F_st ≈ 13 232 N, P_M ≈ 68.9 kW
        assert!((r.driving_force_n - 13_230.79).abs() < 0.01);
        assert!((r.driving_force_n - 13_232.32).abs() < 2.0);
        assert!((r.motor_power_kw() - 68.918).abs() < 0.001);
        assert!((r.motor_power_kw() - 68.93).abs() < 0.02);
    }

    #[test]
    fn test_refinement_tensions() {
        let mut run = solved();
        let refined = run.refine().unwrap().clone();

        // Drive pulley: slack auto-derived, equality satisfied
        assert!((refined.drive_check.tight_n - 21_677.77).abs() < 0.01);
        assert!((refined.drive_check.slack_n - 8_446.99).abs() < 0.01);
        assert!(refined.drive_check.satisfied);

        // Tail pulley: sag floor dominates, slip criterion not met
        assert!((refined.tail_check.tight_n - 35_235.87).abs() < 0.01);
        assert!((refined.tail_check.slack_n - 22_005.08).abs() < 0.01);
        assert!(!refined.tail_check.satisfied);
    }

    #[test]
    fn test_refinement_wrap_and_power() {
        let mut run = solved();
        let refined = run.refine().unwrap().clone();

        assert!((refined.drive_wrap_resistance_n - 152.28).abs() < 0.01);
        assert!((refined.tail_wrap_resistance_n - 143.87).abs() < 0.01);
        assert!((refined.secondary_resistance_n - 5752.19).abs() < 0.01);

        // Refined F_u ≈ 12 807 N, P_M ≈ 66.71 kW
        assert!((refined.driving_force_n - 12_806.94).abs() < 0.01);
        assert!((refined.motor_power_kw() - 66.71).abs() < 0.005);
    }

    #[test]
    fn test_refinement_strictly_changes_results() {
        let mut run = solved();
        let initial_force = run.initial.driving_force_n;
        let initial_power = run.initial.motor_power_w;
        let refined = run.refine().unwrap();

        assert!((refined.driving_force_n - initial_force).abs() > 1.0);
        assert!((refined.motor_power_w - initial_power).abs() > 1.0);
    }

    #[test]
    fn test_refine_is_idempotent() {
        let mut run = solved();
        let first = run.refine().unwrap().clone();
        let second = run.refine().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_state_transition() {
        let mut run = solved();
        assert_eq!(run.state(), DesignState::Initial);
        run.refine().unwrap();
        assert_eq!(run.state(), DesignState::Refined);
    }

    #[test]
    fn test_inclined_conveyor_gains_gravity_resistance() {
        let mut params = flat_coal_conveyor();
        params.operation.install_angle_deg = 5.0;
        let run = DesignRun::solve(&params, Q).unwrap();

        assert!(run.initial.lift_m > 12.0); // 143·sin(5°) ≈ 12.46 m
        assert!(run.initial.gravity_resistance_n > 0.0);

        let flat = solved();
        assert!(run.initial.driving_force_n > flat.initial.driving_force_n);
    }

    #[test]
    fn test_solve_rejects_invalid_parameters() {
        let mut params = flat_coal_conveyor();
        params.operation.belt_speed_m_s = 0.0;
        assert!(DesignRun::solve(&params, Q).is_err());
    }

    #[test]
    fn test_solution_serialization() {
        let mut run = solved();
        run.refine().unwrap();
        let json = serde_json::to_string_pretty(&run).unwrap();

        assert!(json.contains("driving_force_n"));
        assert!(json.contains("drive_check"));

        let roundtrip: DesignRun = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.initial, run.initial);
        assert_eq!(roundtrip.refined, run.refined);
    }
}
