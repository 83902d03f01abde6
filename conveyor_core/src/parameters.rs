//! # Parameter Records and Design Document
//!
//! The `ConveyorProject` struct is the root container for a conveyor design.
//! Projects serialize to `.cvd` (conveyor design) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! ConveyorProject
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! └── conveyor_design: DesignParameters
//!     ├── material         (density, surcharge angle)
//!     ├── operation        (speeds, length, install/wrap angles)
//!     ├── coefficients     (friction factors, drive efficiencies)
//!     ├── belt             (width, thickness, linear mass)
//!     ├── pulley           (drive / tail)
//!     ├── idler            (carry / return)
//!     ├── skirtplates
//!     └── belt_cleaners
//! ```
//!
//! Every record is an immutable value consumed read-only by the formula
//! layer; the target throughput is supplied per calculation run, not stored
//! here, since it describes the operating scenario under analysis.
//!
//! All fields are plain `f64` with unit-suffixed names so the JSON stays
//! clean and the units are visible at every call site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};

/// Current schema version for .cvd files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root design document container.
///
/// This is the top-level struct that gets serialized to `.cvd` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConveyorProject {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// The fully-populated parameter record the calculation engine consumes
    pub conveyor_design: DesignParameters,
}

impl ConveyorProject {
    /// Create a new project around a parameter record.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use conveyor_core::parameters::{ConveyorProject, DesignParameters};
    ///
    /// # fn params() -> DesignParameters { unimplemented!() }
    /// let project = ConveyorProject::new("Jane Engineer", "25-042", "Acme Coal", params());
    /// assert_eq!(project.meta.engineer, "Jane Engineer");
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        conveyor_design: DesignParameters,
    ) -> Self {
        let now = Utc::now();
        ConveyorProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            conveyor_design,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Stable document identifier
    pub id: Uuid,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// The `conveyor_design` parameter grouping.
///
/// Field groups mirror the parameter file layout one-to-one, so a `.cvd`
/// file reads the same way the design brief is organized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignParameters {
    pub material: MaterialProperties,
    pub operation: OperationParameters,
    pub coefficients: FrictionCoefficients,
    pub belt: BeltGeometry,
    pub pulley: PulleyPair,
    pub idler: IdlerPair,
    pub skirtplates: SkirtplateSpec,
    pub belt_cleaners: BeltCleanerSpec,
}

impl DesignParameters {
    /// Validate every parameter that a formula later divides by or that
    /// must be positive for the physics to be meaningful.
    ///
    /// Fails fast on the first offending field; a failure here means the
    /// parameter source is wrong, not that the design is marginal.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("material.density_t_m3", self.material.density_t_m3),
            ("operation.belt_speed_m_s", self.operation.belt_speed_m_s),
            ("belt.width_m", self.belt.width_m),
            ("idler.carry.spacing_m", self.idler.carry.spacing_m),
            ("idler.return.spacing_m", self.idler.r#return.spacing_m),
            (
                "idler.carry.allowable_sag_m",
                self.idler.carry.allowable_sag_m,
            ),
            (
                "idler.return.allowable_sag_m",
                self.idler.r#return.allowable_sag_m,
            ),
            ("pulley.drive.diameter_m", self.pulley.drive.diameter_m),
            ("pulley.tail.diameter_m", self.pulley.tail.diameter_m),
            ("skirtplates.width_m", self.skirtplates.width_m),
            (
                "coefficients.mu_material_belt",
                self.coefficients.mu_material_belt,
            ),
            (
                "coefficients.coupling_efficiency",
                self.coefficients.coupling_efficiency,
            ),
            (
                "coefficients.gearbox_efficiency",
                self.coefficients.gearbox_efficiency,
            ),
        ];

        for (field, value) in positive {
            if value <= 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be positive",
                ));
            }
        }

        Ok(())
    }
}

/// Properties of the conveyed bulk material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Bulk density (t/m³)
    pub density_t_m3: f64,

    /// Surcharge angle of the material at rest on the moving belt (deg)
    pub surcharge_angle_deg: f64,
}

/// Operating parameters of the installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationParameters {
    /// Belt speed v (m/s)
    pub belt_speed_m_s: f64,

    /// Speed of the material as it is fed onto the belt v₀ (m/s)
    pub feed_speed_m_s: f64,

    /// Centre-to-centre length of the conveyor (m)
    pub centre_length_m: f64,

    /// Installation (incline) angle of the conveyor (deg)
    pub install_angle_deg: f64,

    /// Wrap angle of the belt around the pulleys (deg)
    pub wrap_angle_deg: f64,
}

/// Friction coefficients and drive-train efficiencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrictionCoefficients {
    /// Artificial friction factor f for average operating conditions
    #[serde(default = "default_artificial_friction")]
    pub artificial_friction: f64,

    /// μ₁ — material/belt friction coefficient
    pub mu_material_belt: f64,

    /// μ₂ — material/skirtplate friction coefficient
    pub mu_material_skirt: f64,

    /// μ₃ — belt/cleaner friction coefficient
    pub mu_belt_cleaner: f64,

    /// μ_b — belt/pulley friction coefficient
    pub mu_belt_pulley: f64,

    /// η₁ — fluid coupling efficiency
    pub coupling_efficiency: f64,

    /// η₂ — gearbox efficiency
    pub gearbox_efficiency: f64,
}

fn default_artificial_friction() -> f64 {
    0.02
}

impl Default for FrictionCoefficients {
    fn default() -> Self {
        // Typical values for a coal conveyor with rubber lagging
        FrictionCoefficients {
            artificial_friction: default_artificial_friction(),
            mu_material_belt: 0.6,
            mu_material_skirt: 0.6,
            mu_belt_cleaner: 0.6,
            mu_belt_pulley: 0.3,
            coupling_efficiency: 0.95,
            gearbox_efficiency: 0.97,
        }
    }
}

/// Belt geometry and linear mass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeltGeometry {
    /// Total belt width B (m)
    pub width_m: f64,

    /// Belt thickness d (m)
    pub thickness_m: f64,

    /// Width of the material stream at maximum loading b (m)
    pub max_material_width_m: f64,

    /// Belt linear mass q_b (kg/m)
    pub linear_mass_kg_m: f64,
}

/// Drive and tail pulley specifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulleyPair {
    pub drive: PulleySpec,
    pub tail: PulleySpec,
}

/// A single pulley.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulleySpec {
    /// Pulley diameter D (m)
    pub diameter_m: f64,

    /// Inside bearing diameter d₀ (m)
    pub bearing_diameter_m: f64,

    /// Pulley mass (kg)
    pub mass_kg: f64,
}

/// Carry- and return-side idler sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdlerPair {
    pub carry: CarryIdlerSet,
    pub r#return: ReturnIdlerSet,
}

/// Carry-side idler set (loaded strand, three-roll trough).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarryIdlerSet {
    /// Idler spacing a (m)
    pub spacing_m: f64,

    /// Mass of one idler set (kg)
    pub mass_kg: f64,

    /// Allowable belt sag between idlers h_a (m)
    pub allowable_sag_m: f64,

    /// Width of the centre roll in the three-roll set l3 (m)
    pub roll_width_m: f64,

    /// Installed angle of the side rolls (deg)
    pub install_angle_deg: f64,
}

/// Return-side idler set (empty strand, flat rolls).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnIdlerSet {
    /// Idler spacing a (m)
    pub spacing_m: f64,

    /// Mass of one idler set (kg)
    pub mass_kg: f64,

    /// Allowable belt sag between idlers h_a (m)
    pub allowable_sag_m: f64,
}

/// Skirtplates confining the material near the loading zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkirtplateSpec {
    /// Width between the skirtplates b1 (m)
    pub width_m: f64,

    /// Length of the installation fitted with skirtplates l_s (m)
    pub length_m: f64,
}

/// Belt cleaners (scrapers) fitted to the installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeltCleanerSpec {
    /// Cleaner blade width (m)
    pub width_m: f64,

    /// Cleaner blade thickness (m)
    pub thickness_m: f64,

    /// Pressure between cleaner and belt (N/m²)
    pub pressure_n_m2: f64,

    /// Number of cleaners fitted
    pub count: u32,
}

/// Reference flat coal conveyor used across the test suite: 143 m centres,
/// 1.2 m belt, 4.8 m/s, three-roll 45° carry idlers, 180° wrap.
#[cfg(test)]
pub(crate) fn flat_coal_conveyor() -> DesignParameters {
    DesignParameters {
        material: MaterialProperties {
            density_t_m3: 0.85,
            surcharge_angle_deg: 20.0,
        },
        operation: OperationParameters {
            belt_speed_m_s: 4.8,
            feed_speed_m_s: 0.0,
            centre_length_m: 143.0,
            install_angle_deg: 0.0,
            wrap_angle_deg: 180.0,
        },
        coefficients: FrictionCoefficients::default(),
        belt: BeltGeometry {
            width_m: 1.2,
            thickness_m: 0.02,
            max_material_width_m: 1.03,
            linear_mass_kg_m: 16.44,
        },
        pulley: PulleyPair {
            drive: PulleySpec {
                diameter_m: 1.2,
                bearing_diameter_m: 0.25,
                mass_kg: 2400.0,
            },
            tail: PulleySpec {
                diameter_m: 1.0,
                bearing_diameter_m: 0.18,
                mass_kg: 1200.0,
            },
        },
        idler: IdlerPair {
            carry: CarryIdlerSet {
                spacing_m: 1.2,
                mass_kg: 15.5,
                allowable_sag_m: 0.01,
                roll_width_m: 0.436,
                install_angle_deg: 45.0,
            },
            r#return: ReturnIdlerSet {
                spacing_m: 3.0,
                mass_kg: 13.2,
                allowable_sag_m: 0.02,
            },
        },
        skirtplates: SkirtplateSpec {
            width_m: 0.634,
            length_m: 4.0,
        },
        belt_cleaners: BeltCleanerSpec {
            width_m: 1.2,
            thickness_m: 0.008,
            pressure_n_m2: 30_000.0,
            count: 4,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = ConveyorProject::new(
            "Jane Engineer",
            "25-042",
            "Acme Coal",
            flat_coal_conveyor(),
        );
        assert_eq!(project.meta.engineer, "Jane Engineer");
        assert_eq!(project.meta.job_id, "25-042");
        assert_eq!(project.meta.client, "Acme Coal");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let project = ConveyorProject::new("Engineer", "25-001", "Client", flat_coal_conveyor());
        let json = serde_json::to_string_pretty(&project).unwrap();

        // The file layout mirrors the design brief grouping
        assert!(json.contains("conveyor_design"));
        assert!(json.contains("\"material\""));
        assert!(json.contains("\"return\""));
        assert!(json.contains("\"drive\""));

        let roundtrip: ConveyorProject = serde_json::from_str(&json).unwrap();
        assert_eq!(
            roundtrip.conveyor_design.belt.width_m,
            project.conveyor_design.belt.width_m
        );
        assert_eq!(roundtrip.meta.id, project.meta.id);
    }

    #[test]
    fn test_validate_accepts_reference_conveyor() {
        assert!(flat_coal_conveyor().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_speed() {
        let mut params = flat_coal_conveyor();
        params.operation.belt_speed_m_s = 0.0;
        let err = params.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_validate_rejects_zero_sag_limit() {
        let mut params = flat_coal_conveyor();
        params.idler.carry.allowable_sag_m = 0.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_density() {
        let mut params = flat_coal_conveyor();
        params.material.density_t_m3 = -0.85;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_artificial_friction_defaults_when_absent() {
        let json = r#"{
            "mu_material_belt": 0.6,
            "mu_material_skirt": 0.6,
            "mu_belt_cleaner": 0.6,
            "mu_belt_pulley": 0.3,
            "coupling_efficiency": 0.95,
            "gearbox_efficiency": 0.97
        }"#;
        let coefficients: FrictionCoefficients = serde_json::from_str(json).unwrap();
        assert_eq!(coefficients.artificial_friction, 0.02);
    }
}
