//! 2D geometry primitives: points and the grounded plane.

use nalgebra::{Unit, Vector2};

use crate::error::{Result, StructureError};

/// A point or direction in the cross-section plane, in meters.
pub type Point2 = Vector2<f64>;

/// An infinite grounded plane (a line in the 2D cross-section).
///
/// The plane passes through `origin` with unit `normal`. Conductors are
/// expected on the side the normal points to, though the image construction
/// itself does not depend on which side they sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    origin: Point2,
    normal: Unit<Vector2<f64>>,
}

impl GroundPlane {
    /// Create a plane through `origin` with the given (not necessarily unit) normal.
    pub fn new(origin: Point2, normal: Vector2<f64>) -> Result<Self> {
        if !origin.iter().all(|v| v.is_finite()) {
            return Err(StructureError::schema("ground plane origin must be finite"));
        }
        let normal = Unit::try_new(normal, 1e-300)
            .filter(|n| n.iter().all(|v| v.is_finite()))
            .ok_or_else(|| StructureError::schema("ground plane normal must be a non-zero vector"))?;
        Ok(Self { origin, normal })
    }

    /// Horizontal plane `y = height` with the normal pointing up.
    pub fn horizontal(height: f64) -> Self {
        Self {
            origin: Point2::new(0.0, height),
            normal: Vector2::y_axis(),
        }
    }

    /// A point on the plane.
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// Unit normal of the plane.
    pub fn normal(&self) -> Vector2<f64> {
        self.normal.into_inner()
    }

    /// Signed distance from the plane, positive on the normal side.
    pub fn signed_distance(&self, point: &Point2) -> f64 {
        (point - self.origin).dot(self.normal.as_ref())
    }

    /// Mirror a point across the plane.
    pub fn reflect_point(&self, point: &Point2) -> Point2 {
        point - self.normal.into_inner() * (2.0 * self.signed_distance(point))
    }

    /// Mirror a direction vector across the plane.
    pub fn reflect_direction(&self, direction: &Vector2<f64>) -> Vector2<f64> {
        direction - self.normal.into_inner() * (2.0 * direction.dot(self.normal.as_ref()))
    }
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::horizontal(0.0)
    }
}
