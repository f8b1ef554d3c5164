//! Physical constants used by the field solver.

/// Permittivity of free space (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854e-12;

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 2.998e8;

/// Physical constants injected into a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Permittivity of the surrounding medium (F/m).
    pub epsilon0: f64,
    /// Propagation speed used for the L·C = I/c² relation (m/s).
    pub speed_of_light: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            epsilon0: VACUUM_PERMITTIVITY,
            speed_of_light: SPEED_OF_LIGHT,
        }
    }
}

impl PhysicalConstants {
    /// Constants for a uniform medium with relative permittivity `eps_r`.
    pub fn in_medium(eps_r: f64) -> Self {
        Self {
            epsilon0: VACUUM_PERMITTIVITY * eps_r,
            speed_of_light: SPEED_OF_LIGHT / eps_r.sqrt(),
        }
    }

    /// The 1/(4π·ε) prefactor of the 2D logarithmic kernel.
    pub fn kernel_prefactor(&self) -> f64 {
        1.0 / (4.0 * std::f64::consts::PI * self.epsilon0)
    }
}
