mod cylinder;
mod plane;
mod sphere;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;

use crate::error::Result;
use crate::math::{Point2, Point3, Vector3};

use super::surface_type::SurfaceType;

/// Result of projecting a point onto a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProjection {
    /// Surface parameters of the foot point.
    pub uv: Point2,
    /// Distance from the query point to the foot point.
    pub distance: f64,
}

/// Trait for parametric surfaces in 3D space.
pub trait Surface {
    /// Evaluates the surface at `uv`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, uv: &Point2) -> Result<Point3>;

    /// Computes the unit surface normal at `uv` (before face orientation).
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is degenerate.
    fn normal(&self, uv: &Point2) -> Result<Vector3>;

    /// Projects `point` onto the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the projection is undefined (e.g. a point on the axis).
    fn project(&self, point: &Point3) -> Result<SurfaceProjection>;

    /// Canonical surface family.
    fn surface_type(&self) -> SurfaceType;
}
