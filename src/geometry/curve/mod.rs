mod circle;
mod line;

pub use circle::Circle;
pub use line::Line;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Result of projecting a point onto a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveProjection {
    /// Parameter of the foot point.
    pub parameter: f64,
    /// Distance from the query point to the foot point.
    pub distance: f64,
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Projects `point` onto the curve restricted to `[t_min, t_max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if no foot point can be computed.
    fn project(&self, point: &Point3, t_min: f64, t_max: f64) -> Result<CurveProjection>;
}
