//! Solver configuration.
//!
//! Collects everything a solve depends on besides the structure itself:
//! physical constants, the ground-plane location (or its absence), the
//! conditioning threshold used to reject singular systems, and whether
//! the data-parallel stages run on the rayon pool.

use wirecap_core::{GroundPlane, PhysicalConstants};

/// Default reciprocal condition number below which an inversion is rejected.
pub const DEFAULT_RCOND_TOLERANCE: f64 = 1e-13;

/// Solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Physical constants of the surrounding medium.
    pub constants: PhysicalConstants,
    /// Grounded plane for the image construction; `None` solves in free space.
    pub ground: Option<GroundPlane>,
    /// Reciprocal 1-norm condition number below which inversion fails.
    pub rcond_tolerance: f64,
    /// Run assembly, extraction and field sampling on the rayon pool.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            ground: Some(GroundPlane::default()),
            rcond_tolerance: DEFAULT_RCOND_TOLERANCE,
            parallel: true,
        }
    }
}

impl SolverConfig {
    /// Configuration without a ground plane.
    pub fn free_space() -> Self {
        Self {
            ground: None,
            ..Default::default()
        }
    }

    /// Set the physical constants.
    pub fn with_constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Set the ground plane (`None` for free space).
    pub fn with_ground(mut self, ground: Option<GroundPlane>) -> Self {
        self.ground = ground;
        self
    }

    /// Set the reciprocal condition threshold.
    pub fn with_rcond_tolerance(mut self, tolerance: f64) -> Self {
        self.rcond_tolerance = tolerance;
        self
    }

    /// Enable or disable rayon parallelism.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Short description used in log output.
    pub fn describe(&self) -> String {
        let ground = match &self.ground {
            Some(plane) => format!(
                "ground plane through ({:.3e}, {:.3e}) normal ({:.3}, {:.3})",
                plane.origin().x,
                plane.origin().y,
                plane.normal().x,
                plane.normal().y
            ),
            None => "free space".to_string(),
        };
        let mode = if self.parallel { "parallel" } else { "serial" };
        format!("{}, {}", ground, mode)
    }
}
