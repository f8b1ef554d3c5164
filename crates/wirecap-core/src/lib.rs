//! Core data model for Wirecap.
//!
//! This crate describes *what* is being solved: a set of parallel round
//! conductors, their units and mesh density, the physical constants of the
//! surrounding medium, and the grounded plane they sit above.
//!
//! - [`structure`] - Conductors, mesh settings and the JSON structure-file loader
//! - [`units`] - Recognized length units and their scale factors
//! - [`geometry`] - Points and the [`GroundPlane`] used for image charges
//! - [`constants`] - [`PhysicalConstants`] injected into the solver
//! - [`error`] - [`StructureError`] for loading and validation failures

pub mod constants;
pub mod error;
pub mod geometry;
pub mod structure;
pub mod units;

pub use constants::{PhysicalConstants, SPEED_OF_LIGHT, VACUUM_PERMITTIVITY};
pub use error::{Result, StructureError};
pub use geometry::{GroundPlane, Point2};
pub use structure::{
    Conductor, ConductorSpec, MIN_SEGMENTS, MeshConfig, Structure, StructureFile,
};
pub use units::LengthUnit;
