use crate::error::{GeometryError, Result};
use crate::geometry::{CurveProjection, SurfaceProjection, SurfaceType};
use crate::math::{try_normalize, Point2, Point3, Vector3};

use super::{EdgeId, FaceId, TopologyStore, VertexId};

/// Geometric and adjacency queries the interference passes need from the
/// host modeling kernel.
///
/// Exact curve/surface evaluation lives behind this trait; the passes only
/// ever reason about the values it returns. [`TopologyStore`] implements it
/// for the analytic curves and surfaces of this crate.
pub trait GeometryKernel {
    /// Point of the edge's curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is unknown.
    fn evaluate(&self, edge: EdgeId, t: f64) -> Result<Point3>;

    /// Projects a point onto an edge, within its parameter bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is unknown or the projection is undefined.
    fn project_on_edge(&self, point: &Point3, edge: EdgeId) -> Result<CurveProjection>;

    /// Projects a point onto the surface of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is unknown or the projection is undefined.
    fn project_on_face(&self, point: &Point3, face: FaceId) -> Result<SurfaceProjection>;

    /// Unit tangent of the edge at parameter `t`, following the curve direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent vanishes.
    fn tangent_at(&self, edge: EdgeId, t: f64) -> Result<Vector3>;

    /// Unit normal of the face at `uv`, pointing out of the face's material.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vanishes.
    fn normal_at(&self, face: FaceId, uv: &Point2) -> Result<Vector3>;

    /// Unit direction at `edge(t)`, tangent to the face and perpendicular to
    /// the edge, pointing into the face's domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction is undefined at that point.
    fn inward_direction(&self, face: FaceId, edge: EdgeId, t: f64) -> Result<Vector3>;

    /// Canonical family of the face's surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is unknown.
    fn surface_type(&self, face: FaceId) -> Result<SurfaceType>;

    /// Faces of the owning solid that are bounded by `edge`.
    fn boundary_adjacent_faces(&self, edge: EdgeId) -> Vec<FaceId>;

    /// Parameter range `(t_start, t_end)` of the edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is unknown.
    fn edge_bounds(&self, edge: EdgeId) -> Result<(f64, f64)>;

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is unknown.
    fn vertex_point(&self, vertex: VertexId) -> Result<Point3>;

    /// Parameter of `vertex` on `edge` when the vertex bounds the edge.
    fn vertex_parameter(&self, vertex: VertexId, edge: EdgeId) -> Option<f64>;

    /// Returns `true` if the edge has collapsed to a point.
    fn is_degenerated(&self, edge: EdgeId) -> bool;
}

impl GeometryKernel for TopologyStore {
    fn evaluate(&self, edge: EdgeId, t: f64) -> Result<Point3> {
        self.edge(edge)?.curve.evaluate(t)
    }

    fn project_on_edge(&self, point: &Point3, edge: EdgeId) -> Result<CurveProjection> {
        let data = self.edge(edge)?;
        let (lo, hi) = ordered(data.t_start, data.t_end);
        data.curve.project(point, lo, hi)
    }

    fn project_on_face(&self, point: &Point3, face: FaceId) -> Result<SurfaceProjection> {
        self.face(face)?.surface.as_surface().project(point)
    }

    fn tangent_at(&self, edge: EdgeId, t: f64) -> Result<Vector3> {
        let data = self.edge(edge)?;
        if data.is_degenerated() {
            return Err(GeometryError::Degenerate("tangent of a degenerated edge".into()).into());
        }
        let tangent = data.curve.tangent(t)?;
        Ok(if data.t_end < data.t_start {
            -tangent
        } else {
            tangent
        })
    }

    fn normal_at(&self, face: FaceId, uv: &Point2) -> Result<Vector3> {
        let data = self.face(face)?;
        let normal = data.surface.as_surface().normal(uv)?;
        Ok(if data.same_sense { normal } else { -normal })
    }

    fn inward_direction(&self, face: FaceId, edge: EdgeId, t: f64) -> Result<Vector3> {
        let surface = self.face(face)?.surface.as_surface();
        let curve = &self.edge(edge)?.curve;
        let at = curve.evaluate(t)?;
        let tangent = curve.tangent(t)?;
        let normal = surface.normal(&surface.project(&at)?.uv)?;
        let toward = self.boundary_centroid(face)? - at;
        let inward = toward - tangent * toward.dot(&tangent) - normal * toward.dot(&normal);
        try_normalize(&inward)
            .ok_or_else(|| GeometryError::Degenerate("face interior side".into()).into())
    }

    fn surface_type(&self, face: FaceId) -> Result<SurfaceType> {
        Ok(self.face(face)?.surface.as_surface().surface_type())
    }

    fn boundary_adjacent_faces(&self, edge: EdgeId) -> Vec<FaceId> {
        self.faces_of_edge(edge).to_vec()
    }

    fn edge_bounds(&self, edge: EdgeId) -> Result<(f64, f64)> {
        let data = self.edge(edge)?;
        Ok((data.t_start, data.t_end))
    }

    fn vertex_point(&self, vertex: VertexId) -> Result<Point3> {
        Ok(self.vertex(vertex)?.point)
    }

    fn vertex_parameter(&self, vertex: VertexId, edge: EdgeId) -> Option<f64> {
        let data = self.edge(edge).ok()?;
        if data.start == vertex {
            Some(data.t_start)
        } else if data.end == vertex {
            Some(data.t_end)
        } else {
            None
        }
    }

    fn is_degenerated(&self, edge: EdgeId) -> bool {
        self.edge(edge).is_ok_and(super::EdgeData::is_degenerated)
    }
}

impl TopologyStore {
    /// Average of the boundary edges' end and middle points.
    fn boundary_centroid(&self, face: FaceId) -> Result<Point3> {
        let mut sum = Vector3::zeros();
        let mut count = 0_u32;
        for &edge in &self.face(face)?.edges {
            let data = self.edge(edge)?;
            let mid = 0.5 * (data.t_start + data.t_end);
            for t in [data.t_start, mid, data.t_end] {
                sum += data.curve.evaluate(t)?.coords;
                count += 1;
            }
        }
        if count == 0 {
            return Err(GeometryError::Degenerate("face without boundary".into()).into());
        }
        Ok(Point3::from(sum / f64::from(count)))
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Line, Plane};
    use crate::topology::{EdgeCurve, EdgeData, FaceData, FaceSurface, VertexData};
    use approx::assert_relative_eq;

    fn segment(store: &mut TopologyStore, a: Point3, b: Point3) -> EdgeId {
        let start = store.add_vertex(VertexData::new(a));
        let end = store.add_vertex(VertexData::new(b));
        store.add_edge(EdgeData {
            start,
            end,
            curve: EdgeCurve::Line(Line::through(a, b).unwrap()),
            t_start: 0.0,
            t_end: (b - a).norm(),
        })
    }

    #[test]
    fn reversed_face_flips_normal() {
        let mut store = TopologyStore::new();
        let plane = Plane::from_normal(Point3::origin(), Vector3::z()).unwrap();
        let face = store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            edges: vec![],
            same_sense: false,
        });
        let n = store.normal_at(face, &Point2::origin()).unwrap();
        assert_relative_eq!(n, -Vector3::z());
        assert_eq!(store.surface_type(face).unwrap(), SurfaceType::Plane);
    }

    #[test]
    fn adjacency_follows_face_boundaries() {
        let mut store = TopologyStore::new();
        let e = segment(&mut store, Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let plane = Plane::from_normal(Point3::origin(), Vector3::z()).unwrap();
        let f1 = store.add_face(FaceData {
            surface: FaceSurface::Plane(plane.clone()),
            edges: vec![e],
            same_sense: true,
        });
        let f2 = store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            edges: vec![e],
            same_sense: true,
        });
        assert_eq!(store.boundary_adjacent_faces(e), vec![f1, f2]);
    }

    #[test]
    fn inward_direction_points_into_the_square() {
        let mut store = TopologyStore::new();
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let edges: Vec<_> = (0..4)
            .map(|i| segment(&mut store, corners[i], corners[(i + 1) % 4]))
            .collect();
        let plane = Plane::from_normal(Point3::origin(), Vector3::z()).unwrap();
        let face = store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            edges: edges.clone(),
            same_sense: true,
        });
        let inward = store.inward_direction(face, edges[0], 0.5).unwrap();
        assert_relative_eq!(inward, Vector3::y(), epsilon = 1e-12);
        let inward = store.inward_direction(face, edges[1], 0.25).unwrap();
        assert_relative_eq!(inward, -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn vertex_parameters_on_edge() {
        let mut store = TopologyStore::new();
        let e = segment(&mut store, Point3::origin(), Point3::new(0.0, 2.0, 0.0));
        let data = store.edge(e).unwrap().clone();
        assert_eq!(store.vertex_parameter(data.start, e), Some(0.0));
        assert_eq!(store.vertex_parameter(data.end, e), Some(2.0));
        let proj = store.project_on_edge(&Point3::new(1.0, 1.5, 0.0), e).unwrap();
        assert_relative_eq!(proj.parameter, 1.5);
        assert_relative_eq!(proj.distance, 1.0);
        assert!(!store.is_degenerated(e));
    }
}
