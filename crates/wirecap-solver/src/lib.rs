//! 2D electrostatic Method-of-Moments solver for Wirecap.
//!
//! Extracts per-unit-length capacitance and inductance matrices of parallel
//! round conductors above a grounded plane.
//!
//! # Method
//!
//! 1. Each conductor's circular cross-section is split into flat segments
//!    carrying a uniform line-charge density ([`segment`]).
//! 2. The potential every segment induces at every segment midpoint is
//!    evaluated in closed form, with an image segment mirrored across the
//!    ground plane ([`kernel`]), giving the dense coefficient matrix Y
//!    ([`assembly`]).
//! 3. Y is inverted once. Each conductor in turn is driven at 1 V with the
//!    others grounded; `Y⁻¹·V` gives segment densities, which integrate to
//!    one row of the capacitance matrix C ([`extract`]).
//! 4. The inductance matrix follows from `L = C⁻¹ / c²`.
//!
//! # Example
//!
//! ```no_run
//! use wirecap_core::Structure;
//! use wirecap_solver::{SolverConfig, assemble};
//!
//! let structure = Structure::load("cables/single_wire.json")?;
//! let system = assemble(&structure, &SolverConfig::default())?;
//! let c = system.capacitance()?;
//! let l = system.inductance()?;
//! println!("C = {c}\nL = {l}");
//! # Ok::<(), wirecap_solver::Error>(())
//! ```
//!
//! # Module Structure
//!
//! - [`config`] - [`SolverConfig`]: constants, ground plane, tolerances
//! - [`kernel`] - Flat-segment potential kernels and the [`Kernel`] trait
//! - [`segment`] - Conductor discretization and the [`SegmentIndex`]
//! - [`assembly`] - Coefficient matrix assembly and the [`MomSystem`] session
//! - [`extract`] - Charge solves, capacitance and inductance matrices
//! - [`field`] - Potential sampling on a grid for field maps
//! - [`linear`] - Dense inversion with conditioning checks

pub mod assembly;
pub mod config;
pub mod error;
pub mod extract;
pub mod field;
pub mod kernel;
pub mod linear;
pub mod segment;

pub use assembly::{
    MomSystem, assemble, assemble_with_kernel, build_coefficient_matrix, check_ground_clearance,
    kernel_for,
};
pub use config::{DEFAULT_RCOND_TOLERANCE, SolverConfig};
pub use error::{Error, MatrixKind, Result};
pub use extract::{
    capacitance_from_inverse, capacitance_matrix, ideal_wire_over_ground_charge,
    inductance_matrix, inductance_matrix_default, integrate_conductor_charge, segment_voltages,
    solve_charge,
};
pub use field::{MapWindow, PotentialMap};
pub use kernel::{
    DielectricInterfaceKernel, FreeSpaceKernel, ImageKernel, Kernel, dielectric_interface_kernel,
    flat_kernel, flat_kernel_grounded,
};
pub use segment::{Segment, SegmentIndex, segment_length};
