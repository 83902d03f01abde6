//! # conveyor_core - Belt Conveyor Design Calculation Engine
//!
//! `conveyor_core` implements the DIN/ISO 5048 design method for troughed
//! belt conveyors: carrying capacity, motion resistances, belt tensions, and
//! drive motor power. All inputs and outputs are JSON-serializable, so a
//! design document can be stored, diffed, and transmitted as plain text.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions that take input and return results
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Two-Phase**: a standard pass gives a fast sizing estimate; the ISO
//!   refinement pass substitutes precise wrap resistances derived from the
//!   computed belt tensions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use conveyor_core::calculations::design::DesignRun;
//! use conveyor_core::parameters::DesignParameters;
//!
//! # fn params() -> DesignParameters { unimplemented!() }
//! // Standard pass at 2300 t/h
//! let mut run = DesignRun::solve(&params(), 2300.0).unwrap();
//! println!("motor power: {:.2} kW", run.initial.motor_power_kw());
//!
//! // Refinement pass
//! let refined = run.refine().unwrap();
//! println!("refined:     {:.2} kW", refined.motor_power_kw());
//! ```
//!
//! ## Modules
//!
//! - [`parameters`] - Design document container, metadata, and the full
//!   parameter record with validation
//! - [`calculations`] - Capacity, resistance, tension, and power models,
//!   plus the design orchestrator
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod parameters;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{DesignRun, DesignSolution, DesignState, RefinedSolution};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use parameters::{ConveyorProject, DesignParameters, ProjectMetadata};
