use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveProjection};

/// A full circle, `P(t) = center + radius * (cos(t) * ref_dir + sin(t) * binormal)`
/// with `binormal = normal x ref_dir`.
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is zero-length,
    /// or the reference direction is not perpendicular to the normal.
    pub fn new(center: Point3, radius: f64, normal: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }
        let normal_len = normal.norm();
        let ref_len = ref_dir.norm();
        if normal_len < TOLERANCE || ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;
        let ref_dir = ref_dir / ref_len;
        if normal.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
        })
    }

    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let (s, c) = t.sin_cos();
        Ok(self.center + (self.ref_dir * c + self.binormal() * s) * self.radius)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let (s, c) = t.sin_cos();
        Ok(self.binormal() * c - self.ref_dir * s)
    }

    fn project(&self, point: &Point3, t_min: f64, t_max: f64) -> Result<CurveProjection> {
        let dp = point - self.center;
        let in_plane = dp - self.normal * dp.dot(&self.normal);
        if in_plane.norm() < TOLERANCE {
            return Err(GeometryError::ProjectionFailed("point lies on circle axis".into()).into());
        }
        let mut t = in_plane.dot(&self.binormal()).atan2(in_plane.dot(&self.ref_dir));
        if t < t_min {
            t += std::f64::consts::TAU;
        }
        let t = t.clamp(t_min, t_max);
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
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn unit_circle() -> Circle {
        Circle::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn tangent_is_counter_clockwise() {
        let c = unit_circle();
        assert_relative_eq!(c.tangent(0.0).unwrap(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn projection_wraps_into_domain() {
        let c = unit_circle();
        let proj = c.project(&Point3::new(0.0, -2.0, 0.5), 0.0, TAU).unwrap();
        assert_relative_eq!(proj.parameter, 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(proj.distance, 1.25_f64.sqrt(), epsilon = 1e-12);
    }
}
