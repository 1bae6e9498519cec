//! Classification of a curve's passage through a face.

use tracing::{instrument, trace};

use crate::config::Tolerances;
use crate::error::{DsError, OperationError, Result};
use crate::math::{try_normalize, Point3, Vector3, TOLERANCE};
use crate::topology::{EdgeId, GeometryKernel};

use super::ds::BooleanDs;
use super::interference::{Orientation, ShapeIndex, Transition};
use super::registry::ShapeRegistry;
use super::same_domain::SameDomainDetector;

/// A point on an edge, asserted to lie on a face, to classify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionQuery {
    /// The curve being classified.
    pub edge: ShapeIndex,
    /// Parameter of the point on `edge`.
    pub parameter: f64,
    /// Local interval around `parameter` the curve may be sampled in.
    pub bounds: (f64, f64),
    /// The face, also the owner of the resulting transition.
    pub face: ShapeIndex,
    /// A boundary edge of `face` through the point, with the point's
    /// parameter on it. Lets a curve lying in the face be classified by how
    /// it crosses that boundary.
    pub rest: Option<(ShapeIndex, f64)>,
}

/// Computes `(before, after)` states of a curve at a point on a face.
///
/// A curve crossing the face's surface gets `Forward`/`Reversed`, as does a
/// curve lying in the surface that crosses the `rest` boundary edge. A
/// tangential contact is sampled on both sides of the point, then compared
/// against same-domain partners of the face; if neither decides, the
/// result is `Internal`/`External` and is never upgraded.
#[derive(Debug, Clone, Copy)]
pub struct TransitionResolver {
    tolerances: Tolerances,
}

impl TransitionResolver {
    #[must_use]
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Classifies the query point.
    ///
    /// `sharing` lists other faces known to contain the curve; they are
    /// tried as same-domain partners along with the face's recorded group.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`OperationError::PreconditionViolation`] if the
    /// point cannot be evaluated or does not lie on the face. Degenerate
    /// tangents or normals yield recoverable geometry errors.
    #[instrument(level = "trace", skip_all, fields(edge = %query.edge, face = %query.face, t = query.parameter))]
    pub fn resolve<K: GeometryKernel>(
        &self,
        registry: &mut ShapeRegistry,
        kernel: &K,
        detector: &mut SameDomainDetector,
        query: &TransitionQuery,
        sharing: &[ShapeIndex],
    ) -> Result<Transition> {
        let edge = registry.edge_id(query.edge)?;
        let face = registry.face_id(query.face)?;
        let point = kernel
            .evaluate(edge, query.parameter)
            .map_err(precondition("curve point"))?;
        let projection = kernel
            .project_on_face(&point, face)
            .map_err(precondition("face projection"))?;
        if !self.tolerances.is_coincident(projection.distance) {
            return Err(OperationError::PreconditionViolation(format!(
                "point of edge {} at {} is {:e} away from face {}",
                query.edge, query.parameter, projection.distance, query.face
            ))
            .into());
        }

        let tangent = kernel.tangent_at(edge, query.parameter)?;
        let normal = kernel.normal_at(face, &projection.uv)?;
        let sin_tol = self.tolerances.angular.sin();

        let across_surface = tangent.dot(&normal);
        if across_surface.abs() > sin_tol {
            let orientation = if across_surface < 0.0 {
                Orientation::Forward
            } else {
                Orientation::Reversed
            };
            trace!(?orientation, "curve crosses the surface");
            return Ok(Transition::oriented(orientation, query.face));
        }

        if let Some((rest, rest_parameter)) = query.rest {
            let inward = kernel.inward_direction(face, registry.edge_id(rest)?, rest_parameter)?;
            let across_boundary = tangent.dot(&inward);
            if across_boundary.abs() > sin_tol {
                let orientation = if across_boundary > 0.0 {
                    Orientation::Forward
                } else {
                    Orientation::Reversed
                };
                trace!(?orientation, "curve crosses the face boundary");
                return Ok(Transition::oriented(orientation, query.face));
            }
        }

        if let Some(orientation) = self.sample_sides(kernel, edge, query, &point, &normal)? {
            trace!(?orientation, "tangential contact resolved by sampling");
            return Ok(Transition::oriented(orientation, query.face));
        }

        if let Some(orientation) =
            self.against_partners(registry, kernel, detector, query.face, &point, &normal, sharing)?
        {
            trace!(?orientation, "tangential contact resolved by a same-domain face");
            return Ok(Transition::oriented(orientation, query.face));
        }

        trace!("curve lies in the face, left ambiguous");
        Ok(Transition::oriented(Orientation::External, query.face))
    }

    /// Looks at the curve a short step before and after the point.
    ///
    /// The normal points out of the material, so a positive side means the
    /// curve is outside there.
    fn sample_sides<K: GeometryKernel>(
        &self,
        kernel: &K,
        edge: EdgeId,
        query: &TransitionQuery,
        point: &Point3,
        normal: &Vector3,
    ) -> Result<Option<Orientation>> {
        let (lo, hi) = ordered(query.bounds);
        let step = self.tolerances.parameter_step * (hi - lo);
        if step <= TOLERANCE {
            return Ok(None);
        }
        let (t_start, t_end) = kernel.edge_bounds(edge)?;
        let direction = if t_end < t_start { -1.0 } else { 1.0 };
        let sin_tol = self.tolerances.angular.sin();

        let side = |t: f64| -> Result<Option<i8>> {
            if t < lo - TOLERANCE || t > hi + TOLERANCE {
                return Ok(None);
            }
            let chord = kernel.evaluate(edge, t)? - point;
            Ok(try_normalize(&chord).map(|chord| {
                let height = chord.dot(normal);
                if height > sin_tol {
                    1
                } else if height < -sin_tol {
                    -1
                } else {
                    0
                }
            }))
        };
        let before = side(query.parameter - direction * step)?;
        let after = side(query.parameter + direction * step)?;

        Ok(match (before, after) {
            (Some(1), Some(-1)) => Some(Orientation::Forward),
            (Some(-1), Some(1)) => Some(Orientation::Reversed),
            (b, a) if b == Some(-1) || a == Some(-1) => Some(Orientation::Internal),
            (b, a) if b == Some(1) || a == Some(1) => Some(Orientation::External),
            _ => None,
        })
    }

    /// Compares the face with same-domain faces through the same point:
    /// opposite normals put material on both sides of the curve.
    #[allow(clippy::too_many_arguments)]
    fn against_partners<K: GeometryKernel>(
        &self,
        registry: &mut ShapeRegistry,
        kernel: &K,
        detector: &mut SameDomainDetector,
        face: ShapeIndex,
        point: &Point3,
        normal: &Vector3,
        sharing: &[ShapeIndex],
    ) -> Result<Option<Orientation>> {
        let mut candidates: Vec<ShapeIndex> = registry.same_domain(face)?.iter().copied().collect();
        for &other in sharing {
            if other != face && !candidates.contains(&other) {
                candidates.push(other);
            }
        }
        for candidate in candidates {
            if !detector.is_same_domain(registry, kernel, face, candidate, point)? {
                continue;
            }
            let partner = registry.face_id(candidate)?;
            let Ok(projection) = kernel.project_on_face(point, partner) else {
                continue;
            };
            if projection.distance > self.tolerances.distance {
                continue;
            }
            let partner_normal = kernel.normal_at(partner, &projection.uv)?;
            return Ok(Some(if normal.dot(&partner_normal) < 0.0 {
                Orientation::Internal
            } else {
                Orientation::External
            }));
        }
        Ok(None)
    }
}

/// Parameters of the nearest interferences on `edge` around `parameter`,
/// falling back to the edge's own bounds.
///
/// # Errors
///
/// Returns an error if `edge` is not a registered edge.
pub fn local_interval<K: GeometryKernel>(
    ds: &BooleanDs,
    kernel: &K,
    edge: ShapeIndex,
    parameter: f64,
) -> Result<(f64, f64)> {
    let (mut lo, mut hi) = ordered(kernel.edge_bounds(ds.registry().edge_id(edge)?)?);
    for t in ds.interferences_of(edge)?.iter().filter_map(|i| i.parameter()) {
        if t < parameter - TOLERANCE && t > lo {
            lo = t;
        }
        if t > parameter + TOLERANCE && t < hi {
            hi = t;
        }
    }
    Ok((lo, hi))
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn precondition(what: &'static str) -> impl FnOnce(DsError) -> DsError {
    move |err| {
        if err.is_fatal() {
            err
        } else {
            OperationError::PreconditionViolation(format!("{what}: {err}")).into()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line};
    use crate::operations::boolean::{Geometry, Interference, Rank, State, Support};
    use crate::operations::creation::MakeBox;
    use crate::topology::{EdgeCurve, EdgeData, FaceId, ShapeRef, SolidId, TopologyStore, VertexData};

    struct Fixture {
        store: TopologyStore,
        ds: BooleanDs,
        detector: SameDomainDetector,
        resolver: TransitionResolver,
        solid: SolidId,
    }

    impl Fixture {
        fn unit_box() -> Self {
            let tolerances = Tolerances::default();
            let mut store = TopologyStore::new();
            let solid = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
                .execute(&mut store)
                .unwrap();
            let mut ds = BooleanDs::default();
            for shape in store.explore_solid(solid).unwrap() {
                ds.register(shape, Rank::First);
            }
            Self {
                store,
                ds,
                detector: SameDomainDetector::new(&tolerances),
                resolver: TransitionResolver::new(tolerances),
                solid,
            }
        }

        fn face(&self, slot: usize) -> (FaceId, ShapeIndex) {
            let id = self.store.solid(self.solid).unwrap().faces[slot];
            (id, self.ds.registry().index_of(ShapeRef::Face(id)).unwrap())
        }

        fn section(&mut self, curve: EdgeCurve, t_start: f64, t_end: f64) -> ShapeIndex {
            let a = curve.evaluate(t_start).unwrap();
            let b = curve.evaluate(t_end).unwrap();
            let start = self.store.add_vertex(VertexData::new(a));
            let end = self.store.add_vertex(VertexData::new(b));
            let id = self.store.add_edge(EdgeData { start, end, curve, t_start, t_end });
            self.ds.register_section_edge(id, Rank::Second).unwrap()
        }

        fn line(&mut self, a: Point3, b: Point3) -> ShapeIndex {
            let length = (b - a).norm();
            self.section(EdgeCurve::Line(Line::through(a, b).unwrap()), 0.0, length)
        }

        fn resolve(&mut self, query: &TransitionQuery) -> Result<Transition> {
            self.resolver.resolve(
                self.ds.registry_mut(),
                &self.store,
                &mut self.detector,
                query,
                &[],
            )
        }
    }

    fn query(edge: ShapeIndex, parameter: f64, bounds: (f64, f64), face: ShapeIndex) -> TransitionQuery {
        TransitionQuery { edge, parameter, bounds, face, rest: None }
    }

    #[test]
    fn crossing_into_the_material_is_forward() {
        let mut fx = Fixture::unit_box();
        // face 4 is z = 0 with outward normal -z
        let (_, bottom) = fx.face(4);
        let up = fx.line(Point3::new(0.5, 0.5, -1.0), Point3::new(0.5, 0.5, 1.0));
        let t = fx.resolve(&query(up, 1.0, (0.0, 2.0), bottom)).unwrap();
        assert_eq!((t.before, t.after), (State::Forward, State::Reversed));
        assert_eq!(t.owner, bottom);

        let down = fx.line(Point3::new(0.5, 0.5, 1.0), Point3::new(0.5, 0.5, -1.0));
        let t = fx.resolve(&query(down, 1.0, (0.0, 2.0), bottom)).unwrap();
        assert_eq!(t.orientation(), Some(Orientation::Reversed));
    }

    #[test]
    fn curve_in_the_face_crosses_its_boundary() {
        let mut fx = Fixture::unit_box();
        let (bottom_id, bottom) = fx.face(4);
        let boundary_id = fx.store.face(bottom_id).unwrap().edges.iter().copied().find(|&e| {
            let p = fx.store.edge(e).unwrap().curve.evaluate(0.5).unwrap();
            p.y.abs() < 1e-12
        });
        let boundary = fx.ds.registry().index_of(ShapeRef::Edge(boundary_id.unwrap())).unwrap();
        let inward = fx.line(Point3::new(0.5, 0.0, 0.0), Point3::new(0.5, 1.0, 0.0));
        let q = TransitionQuery {
            rest: Some((boundary, 0.5)),
            ..query(inward, 0.0, (0.0, 1.0), bottom)
        };
        let t = fx.resolve(&q).unwrap();
        assert_eq!(t.orientation(), Some(Orientation::Forward));
    }

    #[test]
    fn touching_circle_is_external() {
        let mut fx = Fixture::unit_box();
        let (_, bottom) = fx.face(4);
        // circle of radius 1 in the plane y = 0.5, touching z = 0 from below at its top
        let circle = Circle::new(Point3::new(0.5, 0.5, -1.0), 1.0, Vector3::y(), Vector3::z()).unwrap();
        let edge = fx.section(EdgeCurve::Circle(circle), -1.0, 1.0);
        let t = fx.resolve(&query(edge, 0.0, (-1.0, 1.0), bottom)).unwrap();
        assert_eq!(t.orientation(), Some(Orientation::External));
    }

    #[test]
    fn flat_contact_without_partner_stays_ambiguous() {
        let mut fx = Fixture::unit_box();
        let (_, bottom) = fx.face(4);
        let edge = fx.line(Point3::new(0.2, 0.5, 0.0), Point3::new(0.8, 0.5, 0.0));
        let t = fx.resolve(&query(edge, 0.3, (0.0, 0.6), bottom)).unwrap();
        assert_eq!((t.before, t.after), (State::External, State::Internal));
    }

    #[test]
    fn point_off_the_face_is_a_precondition_violation() {
        let mut fx = Fixture::unit_box();
        let (_, bottom) = fx.face(4);
        let edge = fx.line(Point3::new(0.5, 0.5, 0.5), Point3::new(0.5, 0.5, 2.0));
        let err = fx.resolve(&query(edge, 0.0, (0.0, 1.5), bottom)).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, DsError::Operation(OperationError::PreconditionViolation(_))));
    }

    #[test]
    fn local_interval_stops_at_neighbouring_interferences() {
        let mut fx = Fixture::unit_box();
        let (_, bottom) = fx.face(4);
        let edge = fx.line(Point3::new(0.0, 0.5, 0.0), Point3::new(1.0, 0.5, 0.0));
        for t in [0.2, 0.7] {
            let p = fx.ds.add_point(Point3::new(t, 0.5, 0.0), 1e-7);
            let i = Interference::new(
                Geometry::Point { index: p, parameter: Some(t) },
                Support::Face(bottom),
                Transition::unknown(bottom),
            );
            fx.ds.store_interference(edge, i).unwrap();
        }
        assert_eq!(local_interval(&fx.ds, &fx.store, edge, 0.5).unwrap(), (0.2, 0.7));
        assert_eq!(local_interval(&fx.ds, &fx.store, edge, 0.1).unwrap(), (0.0, 0.2));
        assert_eq!(local_interval(&fx.ds, &fx.store, edge, 0.7).unwrap(), (0.2, 1.0));
    }
}
