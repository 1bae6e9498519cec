use crate::error::{GeometryError, Result};
use crate::math::{perpendicular_dir, Point2, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceProjection, SurfaceType};

/// An infinite plane, `P(u, v) = origin + u * u_dir + v * v_dir`.
///
/// The normal is `u_dir x v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are chosen automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;
        let u_dir = perpendicular_dir(&normal);
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed distance of `point` along the plane normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }
}

impl Surface for Plane {
    fn evaluate(&self, uv: &Point2) -> Result<Point3> {
        Ok(self.origin + self.u_dir * uv.x + self.v_dir * uv.y)
    }

    fn normal(&self, _uv: &Point2) -> Result<Vector3> {
        Ok(self.normal)
    }

    fn project(&self, point: &Point3) -> Result<SurfaceProjection> {
        let dp = point - self.origin;
        Ok(SurfaceProjection {
            uv: Point2::new(dp.dot(&self.u_dir), dp.dot(&self.v_dir)),
            distance: self.signed_distance(point).abs(),
        })
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Plane
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_lands_on_plane() {
        let plane = Plane::from_normal(Point3::new(0.0, 0.0, 1.0), Vector3::z()).unwrap();
        let proj = plane.project(&Point3::new(0.3, -0.7, 3.0)).unwrap();
        assert_relative_eq!(proj.distance, 2.0);
        let foot = plane.evaluate(&proj.uv).unwrap();
        assert_relative_eq!(foot, Point3::new(0.3, -0.7, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn normal_is_unit_and_constant() {
        let plane = Plane::from_normal(Point3::origin(), Vector3::new(0.0, -2.0, 0.0)).unwrap();
        assert_relative_eq!(plane.normal(&Point2::new(5.0, 5.0)).unwrap(), -Vector3::y());
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(Plane::from_normal(Point3::origin(), Vector3::zeros()).is_err());
    }
}
