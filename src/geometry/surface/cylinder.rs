use crate::error::{GeometryError, Result};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceProjection, SurfaceType};

/// A cylindrical surface around an axis through `center`.
///
/// `P(u, v) = center + radius * (cos(u) * ref_dir + sin(u) * binormal) + v * axis`
/// where `binormal = axis x ref_dir`. The normal points away from the axis.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the axis is zero-length,
    /// or the reference direction is not perpendicular to the axis.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        let axis_len = axis.norm();
        let ref_len = ref_dir.norm();
        if axis_len < TOLERANCE || ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;
        let ref_dir = ref_dir / ref_len;
        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
        })
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, uv: &Point2) -> Result<Point3> {
        let radial = self.ref_dir * uv.x.cos() + self.binormal() * uv.x.sin();
        Ok(self.center + radial * self.radius + self.axis * uv.y)
    }

    fn normal(&self, uv: &Point2) -> Result<Vector3> {
        Ok(self.ref_dir * uv.x.cos() + self.binormal() * uv.x.sin())
    }

    fn project(&self, point: &Point3) -> Result<SurfaceProjection> {
        let dp = point - self.center;
        let v = dp.dot(&self.axis);
        let radial = dp - self.axis * v;
        let radial_len = radial.norm();
        if radial_len < TOLERANCE {
            return Err(GeometryError::ProjectionFailed("point lies on cylinder axis".into()).into());
        }
        let u = radial.dot(&self.binormal()).atan2(radial.dot(&self.ref_dir));
        Ok(SurfaceProjection {
            uv: Point2::new(u, v),
            distance: (radial_len - self.radius).abs(),
        })
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Cylinder
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn z_cylinder(radius: f64) -> Cylinder {
        Cylinder::new(Point3::origin(), radius, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn normal_points_away_from_axis() {
        let c = z_cylinder(1.0);
        let n = c.normal(&Point2::new(FRAC_PI_2, 0.0)).unwrap();
        assert_relative_eq!(n, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn projection_inverts_evaluation() {
        let c = z_cylinder(2.0);
        let p = c.evaluate(&Point2::new(1.0, -2.5)).unwrap();
        let proj = c.project(&p).unwrap();
        assert!(proj.distance < 1e-12);
        assert_relative_eq!(proj.uv, Point2::new(1.0, -2.5), epsilon = 1e-12);
    }

    #[test]
    fn point_on_axis_has_no_projection() {
        let c = z_cylinder(1.0);
        assert!(c.project(&Point3::new(0.0, 0.0, 3.0)).is_err());
    }

    #[test]
    fn invalid_radius() {
        assert!(Cylinder::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x()).is_err());
    }
}
