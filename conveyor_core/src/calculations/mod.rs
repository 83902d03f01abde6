//! # Conveyor Calculations
//!
//! The formula layer of the engine. Each module holds pure functions that
//! map plain `f64` inputs to forces, tensions, or power; none of them hold
//! state or perform I/O. The [`design`] module sequences them into the
//! standard design pass and the ISO refinement pass.
//!
//! ## Available Modules
//!
//! - [`capacity`] - Cross-sectional area, flow rates, linear mass densities
//! - [`resistances`] - Main, secondary, concentrated, and wrap resistances
//! - [`tension`] - Capstan (Euler) transmission check and belt-sag minimums
//! - [`power`] - Drive motor power
//! - [`design`] - Orchestration of the two-phase design run

pub mod capacity;
pub mod design;
pub mod power;
pub mod resistances;
pub mod tension;

// Re-export commonly used types
pub use design::{DesignRun, DesignSolution, DesignState, RefinedSolution};
pub use tension::{SagTensions, TransmissionCheck};

/// Standard gravitational acceleration (m/s²).
///
/// Named once so a different unit system or precision only requires a
/// single change.
pub const STANDARD_GRAVITY: f64 = 9.81;
