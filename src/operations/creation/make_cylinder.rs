use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::geometry::{Circle, Cylinder, Line, Plane};
use crate::math::{perpendicular_dir, Point3, Vector3, TOLERANCE};
use crate::topology::{
    EdgeCurve, EdgeData, FaceData, FaceSurface, SolidData, SolidId, TopologyStore, VertexData,
};

/// Creates a cylinder solid from base center, radius, axis, and height.
///
/// Faces are `lateral, bottom cap, top cap`. The lateral face is bounded by
/// the two rim circles and a straight seam joining their start points.
pub struct MakeCylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    height: f64,
}

impl MakeCylinder {
    /// Creates a new `MakeCylinder` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64, axis: Vector3, height: f64) -> Self {
        Self {
            center,
            radius,
            axis,
            height,
        }
    }

    /// Executes the operation, creating the cylinder in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is not positive, or the axis
    /// direction is degenerate.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.radius < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder radius must be positive".into()).into(),
            );
        }
        if self.height < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder height must be positive".into()).into(),
            );
        }
        let axis_len = self.axis.norm();
        if axis_len < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder axis must be non-zero".into()).into(),
            );
        }
        let axis = self.axis / axis_len;
        let ref_dir = perpendicular_dir(&axis);
        let top_center = self.center + axis * self.height;

        let seam_bottom = self.center + ref_dir * self.radius;
        let seam_top = seam_bottom + axis * self.height;
        let v_bottom = store.add_vertex(VertexData::new(seam_bottom));
        let v_top = store.add_vertex(VertexData::new(seam_top));

        let mut rim = |center: Point3, vertex| -> Result<_> {
            Ok(store.add_edge(EdgeData {
                start: vertex,
                end: vertex,
                curve: EdgeCurve::Circle(Circle::new(center, self.radius, axis, ref_dir)?),
                t_start: 0.0,
                t_end: TAU,
            }))
        };
        let bottom_rim = rim(self.center, v_bottom)?;
        let top_rim = rim(top_center, v_top)?;
        let seam = store.add_edge(EdgeData {
            start: v_bottom,
            end: v_top,
            curve: EdgeCurve::Line(Line::through(seam_bottom, seam_top)?),
            t_start: 0.0,
            t_end: self.height,
        });

        let lateral = store.add_face(FaceData {
            surface: FaceSurface::Cylinder(Cylinder::new(self.center, self.radius, axis, ref_dir)?),
            edges: vec![bottom_rim, top_rim, seam],
            same_sense: true,
        });
        let bottom = store.add_face(FaceData {
            surface: FaceSurface::Plane(Plane::from_normal(self.center, -axis)?),
            edges: vec![bottom_rim],
            same_sense: true,
        });
        let top = store.add_face(FaceData {
            surface: FaceSurface::Plane(Plane::from_normal(top_center, axis)?),
            edges: vec![top_rim],
            same_sense: true,
        });

        Ok(store.add_solid(SolidData {
            faces: vec![lateral, bottom, top],
        }))
    }
}
