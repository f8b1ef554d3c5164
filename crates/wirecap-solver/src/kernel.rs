//! Closed-form potential kernels of a flat, uniformly charged segment.
//!
//! All kernels work in the source segment's local frame: origin at the
//! segment midpoint, x-axis along the segment, y-axis along its left normal.
//! In that frame the potential of a unit line-charge density spread over
//! `x' ∈ [-L/2, L/2]` is
//!
//! ```text
//! φ(x, y) = -1/(4π·ε) · ∫ ln((x' - x)² + y²) dx'
//! ```
//!
//! and the integral has the closed form evaluated by [`log_integral`].

use std::f64::consts::PI;

use nalgebra::Vector2;
use wirecap_core::{GroundPlane, PhysicalConstants, Point2};

use crate::error::{Error, Result};
use crate::segment::Segment;

/// Potential of a source segment evaluated at a probe point.
///
/// Implementations must be pure functions of static geometry so assembly can
/// evaluate them from many threads at once.
pub trait Kernel: Sync {
    /// Value of the kernel at `probe` for a unit density on `source`.
    fn potential(&self, probe: &Point2, source: &Segment) -> f64;

    /// Short name for log output.
    fn name(&self) -> &'static str;
}

/// Coordinates of `probe` in the frame of a segment at `mid` along `direction`.
fn local_frame(probe: &Point2, mid: &Point2, direction: &Vector2<f64>) -> (f64, f64) {
    let x_hat = direction.normalize();
    let y_hat = Vector2::new(-x_hat.y, x_hat.x);
    let r = probe - mid;
    (r.dot(&x_hat), r.dot(&y_hat))
}

/// `∫ ln((x' - x)² + y²) dx'` over `x' ∈ [-half, half]`.
///
/// Finite everywhere, including on the segment itself; at an endpoint the
/// `u·ln(u²)` term takes its limit of zero.
pub fn log_integral(x: f64, y: f64, half: f64) -> f64 {
    let antiderivative = |a: f64| {
        let u = a - x;
        let r2 = u * u + y * y;
        let log_term = if r2 > 0.0 { u * r2.ln() } else { 0.0 };
        log_term - 2.0 * y * y.atan2(u) - 2.0 * a
    };
    antiderivative(half) - antiderivative(-half)
}

/// Potential at `probe` of a uniform unit line-charge density on a flat segment.
///
/// The segment is centered at `source_mid`, oriented along `source_direction`
/// (need not be normalized) and `length` meters long.
pub fn flat_kernel(
    probe: &Point2,
    source_mid: &Point2,
    source_direction: &Vector2<f64>,
    length: f64,
    constants: &PhysicalConstants,
) -> f64 {
    let (x, y) = local_frame(probe, source_mid, source_direction);
    -log_integral(x, y, length / 2.0) * constants.kernel_prefactor()
}

/// [`flat_kernel`] with the image of the source mirrored across a grounded plane.
///
/// The potential vanishes everywhere on `plane`.
pub fn flat_kernel_grounded(
    probe: &Point2,
    source_mid: &Point2,
    source_direction: &Vector2<f64>,
    length: f64,
    plane: &GroundPlane,
    constants: &PhysicalConstants,
) -> f64 {
    let image_mid = plane.reflect_point(source_mid);
    let image_direction = plane.reflect_direction(source_direction);

    flat_kernel(probe, source_mid, source_direction, length, constants)
        - flat_kernel(probe, &image_mid, &image_direction, length, constants)
}

/// Induced surface-charge kernel at a dielectric interface along the segment.
///
/// `eps1` is the relative permittivity on the `-x` side of the probe, `eps2`
/// on the `+x` side (x along the source segment), and `step` the central
/// finite-difference step as a fraction of `length`. The result is
/// `(ε₁+ε₂)(ε₂−ε₁)/(8π·ε₁·ε₂) · ∂/∂x ∫ln(r²)dx'`.
pub fn dielectric_interface_kernel(
    probe: &Point2,
    source_mid: &Point2,
    source_direction: &Vector2<f64>,
    length: f64,
    eps1: f64,
    eps2: f64,
    step: f64,
) -> f64 {
    let (x, y) = local_frame(probe, source_mid, source_direction);
    let half = length / 2.0;
    let h = step * length;

    let derivative = (log_integral(x + h, y, half) - log_integral(x - h, y, half)) / (2.0 * h);
    (eps1 + eps2) * (eps2 - eps1) / (eps1 * eps2 * 8.0 * PI) * derivative
}

/// Free-space kernel, no ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeSpaceKernel {
    pub constants: PhysicalConstants,
}

impl FreeSpaceKernel {
    pub fn new(constants: PhysicalConstants) -> Self {
        Self { constants }
    }
}

impl Kernel for FreeSpaceKernel {
    fn potential(&self, probe: &Point2, source: &Segment) -> f64 {
        flat_kernel(
            probe,
            &source.midpoint,
            &source.direction,
            source.length,
            &self.constants,
        )
    }

    fn name(&self) -> &'static str {
        "free-space"
    }
}

/// Free-space kernel plus a ground-plane image charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageKernel {
    pub constants: PhysicalConstants,
    pub plane: GroundPlane,
}

impl ImageKernel {
    pub fn new(constants: PhysicalConstants, plane: GroundPlane) -> Self {
        Self { constants, plane }
    }
}

impl Kernel for ImageKernel {
    fn potential(&self, probe: &Point2, source: &Segment) -> f64 {
        flat_kernel_grounded(
            probe,
            &source.midpoint,
            &source.direction,
            source.length,
            &self.plane,
            &self.constants,
        )
    }

    fn name(&self) -> &'static str {
        "ground-image"
    }
}

/// Default finite-difference step of the dielectric kernel, relative to segment length.
pub const DEFAULT_DIELECTRIC_STEP: f64 = 0.01;

/// Dielectric-interface surface-charge kernel.
///
/// Not used by [`crate::assemble`]; available through
/// [`crate::assemble_with_kernel`] or evaluated directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DielectricInterfaceKernel {
    eps1: f64,
    eps2: f64,
    step: f64,
}

impl DielectricInterfaceKernel {
    /// Create a kernel for relative permittivities `eps1` (−x side) and `eps2` (+x side).
    pub fn new(eps1: f64, eps2: f64, step: f64) -> Result<Self> {
        for (name, value) in [("eps1", eps1), ("eps2", eps2), ("step", step)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(Self { eps1, eps2, step })
    }

    /// Kernel with the default finite-difference step.
    pub fn with_default_step(eps1: f64, eps2: f64) -> Result<Self> {
        Self::new(eps1, eps2, DEFAULT_DIELECTRIC_STEP)
    }

    pub fn eps1(&self) -> f64 {
        self.eps1
    }

    pub fn eps2(&self) -> f64 {
        self.eps2
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Kernel for DielectricInterfaceKernel {
    fn potential(&self, probe: &Point2, source: &Segment) -> f64 {
        dielectric_interface_kernel(
            probe,
            &source.midpoint,
            &source.direction,
            source.length,
            self.eps1,
            self.eps2,
            self.step,
        )
    }

    fn name(&self) -> &'static str {
        "dielectric-interface"
    }
}
