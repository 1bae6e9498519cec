use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveProjection};

/// An infinite line, `P(t) = origin + t * direction` with a unit direction.
///
/// Section edges between planar faces and the straight edges of boxes
/// are carried on lines.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates the line through `a` and `b`, parametrized by arc length from `a`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(a: Point3, b: Point3) -> Result<Self> {
        Self::new(a, b - a)
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.origin + self.direction * t)
    }

    fn tangent(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn project(&self, point: &Point3, t_min: f64, t_max: f64) -> Result<CurveProjection> {
        let t = (point - self.origin).dot(&self.direction).clamp(t_min, t_max);
        let foot = self.evaluate(t)?;
        Ok(CurveProjection {
            parameter: t,
            distance: (point - foot).norm(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn through_is_arc_length() {
        let line = Line::through(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 4.0)).unwrap();
        let p = line.evaluate(2.0).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 2.0));
        assert_relative_eq!(line.tangent(0.0).unwrap(), Vector3::z());
    }

    #[test]
    fn projection_is_clamped() {
        let line = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let proj = line.project(&Point3::new(3.0, 1.0, 0.0), 0.0, 1.0).unwrap();
        assert_relative_eq!(proj.parameter, 1.0);
        assert_relative_eq!(proj.distance, 5.0_f64.sqrt());
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Line::new(Point3::origin(), Vector3::zeros()).is_err());
        assert!(Line::through(Point3::origin(), Point3::origin()).is_err());
    }
}
