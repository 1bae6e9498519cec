use crate::error::{OperationError, Result};
use crate::geometry::{Line, Plane};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{
    EdgeCurve, EdgeData, EdgeId, FaceData, FaceSurface, SolidData, SolidId, TopologyStore,
    VertexData, VertexId,
};

/// Creates an axis-aligned box solid from two corner points.
///
/// The solid's faces come in the order `x min, x max, y min, y max, z min,
/// z max`, each a plane with its normal pointing out of the box. Edges are
/// lines running from the lower to the upper corner.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is flat along any axis.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        if (0..3).any(|axis| hi[axis] - lo[axis] < TOLERANCE) {
            return Err(OperationError::InvalidInput("box extents must be positive".into()).into());
        }

        // Corner `n` takes the max coordinate along each axis whose bit is set.
        let corner = |n: usize| {
            Point3::new(
                if n & 1 == 0 { lo.x } else { hi.x },
                if n & 2 == 0 { lo.y } else { hi.y },
                if n & 4 == 0 { lo.z } else { hi.z },
            )
        };
        let vertices: Vec<VertexId> = (0..8)
            .map(|n| store.add_vertex(VertexData::new(corner(n))))
            .collect();

        let mut edges: Vec<(usize, usize, EdgeId)> = Vec::with_capacity(12);
        for axis in 0..3 {
            for n in (0..8).filter(|n| n & (1 << axis) == 0) {
                let m = n | (1 << axis);
                let (a, b) = (corner(n), corner(m));
                let id = store.add_edge(EdgeData {
                    start: vertices[n],
                    end: vertices[m],
                    curve: EdgeCurve::Line(Line::through(a, b)?),
                    t_start: 0.0,
                    t_end: (b - a).norm(),
                });
                edges.push((n, m, id));
            }
        }

        let mut faces = Vec::with_capacity(6);
        for axis in 0..3 {
            for side in [0, 1] {
                let on_face = |n: usize| (n >> axis) & 1 == side;
                let face_edges = edges
                    .iter()
                    .filter(|(n, m, _)| on_face(*n) && on_face(*m))
                    .map(|&(_, _, id)| id)
                    .collect();
                let mut normal = Vector3::zeros();
                normal[axis] = if side == 1 { 1.0 } else { -1.0 };
                let plane = Plane::from_normal(corner(side << axis), normal)?;
                faces.push(store.add_face(FaceData {
                    surface: FaceSurface::Plane(plane),
                    edges: face_edges,
                    same_sense: true,
                }));
            }
        }

        Ok(store.add_solid(SolidData { faces }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::topology::GeometryKernel;
    use approx::assert_relative_eq;

    fn unit_box(store: &mut TopologyStore) -> SolidId {
        MakeBox::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0))
            .execute(store)
            .unwrap()
    }

    #[test]
    fn box_has_six_faces_of_four_edges() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let faces = &store.solid(solid).unwrap().faces;
        assert_eq!(faces.len(), 6);
        for &face in faces {
            assert_eq!(store.face(face).unwrap().edges.len(), 4);
        }
        let shapes = store.explore_solid(solid).unwrap();
        // solid + 6 faces + 12 edges + 8 vertices
        assert_eq!(shapes.len(), 27);
    }

    #[test]
    fn normals_point_outward() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let faces = store.solid(solid).unwrap().faces.clone();
        let expected = [
            -Vector3::x(),
            Vector3::x(),
            -Vector3::y(),
            Vector3::y(),
            -Vector3::z(),
            Vector3::z(),
        ];
        for (face, n) in faces.iter().zip(expected) {
            assert_relative_eq!(store.normal_at(*face, &Point2::origin()).unwrap(), n);
        }
        let top = store.project_on_face(&Point3::new(0.5, 0.5, 3.0), faces[5]).unwrap();
        assert_relative_eq!(top.distance, 0.0);
    }

    #[test]
    fn every_edge_bounds_two_faces() {
        let mut store = TopologyStore::new();
        let solid = unit_box(&mut store);
        let face = store.solid(solid).unwrap().faces[0];
        for &edge in &store.face(face).unwrap().edges {
            assert_eq!(store.boundary_adjacent_faces(edge).len(), 2);
        }
    }

    #[test]
    fn flat_box_is_rejected() {
        let mut store = TopologyStore::new();
        let result = MakeBox::new(Point3::origin(), Point3::new(1.0, 0.0, 1.0)).execute(&mut store);
        assert!(result.is_err());
    }
}
