use crate::error::{GeometryError, Result};
use crate::math::{perpendicular_dir, Point2, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceProjection, SurfaceType};

/// A sphere with longitude `u` and latitude `v` measured from `axis`.
///
/// The outward normal is `(P - center) / radius`; it degenerates at the poles
/// only through the parametrization, not geometrically.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Sphere {
    /// Creates a sphere around `center` with its poles along `axis`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the axis is zero-length.
    pub fn new(center: Point3, radius: f64, axis: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("sphere radius must be positive".into()).into());
        }
        let axis_len = axis.norm();
        if axis_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;
        Ok(Self {
            center,
            radius,
            axis,
            ref_dir: perpendicular_dir(&axis),
        })
    }

    /// Returns the center of the sphere.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    fn direction(&self, uv: &Point2) -> Vector3 {
        let (su, cu) = uv.x.sin_cos();
        let (sv, cv) = uv.y.sin_cos();
        self.ref_dir * (cv * cu) + self.binormal() * (cv * su) + self.axis * sv
    }
}

impl Surface for Sphere {
    fn evaluate(&self, uv: &Point2) -> Result<Point3> {
        Ok(self.center + self.direction(uv) * self.radius)
    }

    fn normal(&self, uv: &Point2) -> Result<Vector3> {
        Ok(self.direction(uv))
    }

    fn project(&self, point: &Point3) -> Result<SurfaceProjection> {
        let dp = point - self.center;
        let len = dp.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ProjectionFailed("point is the sphere center".into()).into());
        }
        let d = dp / len;
        let v = d.dot(&self.axis).clamp(-1.0, 1.0).asin();
        let u = d.dot(&self.binormal()).atan2(d.dot(&self.ref_dir));
        Ok(SurfaceProjection {
            uv: Point2::new(u, v),
            distance: (len - self.radius).abs(),
        })
    }

    fn surface_type(&self) -> SurfaceType {
        SurfaceType::Sphere
    }
}
