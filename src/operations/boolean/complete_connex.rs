use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::topology::{GeometryKernel, ShapeKind};

use super::connexity::Connexity;
use super::interference::{Geometry, GeometryKind, Interference, ShapeIndex, Support, SupportKind};
use super::pass::{recover, PassContext};
use super::select::{group_by_geometry, select, Selector};
use super::transition::{local_interval, TransitionQuery};

/// Adds the face interference a section edge is missing at a point where it
/// meets an edge of the other operand.
///
/// The section edge carries an interference at `G` against edge `ES`, owned
/// by face `FTRA`, but no face interference there. Every other face `FCX`
/// bounded by `ES` and passing through `G` gets one, with a transition
/// computed against `FCX`. Vertices bounding the section edge are skipped.
/// Returns the number of added interferences.
#[instrument(skip_all)]
pub(super) fn complete_connected<K: GeometryKernel>(ctx: &mut PassContext<'_, K>) -> Result<usize> {
    let connexity = ctx.connexity();
    let mut added = 0;
    for edge in ctx.section_edges() {
        let mut list = ctx.ds.interferences_of(edge)?.to_vec();
        let mut extra = Vec::new();
        for (_, group) in group_by_geometry(&list) {
            let found = complete_group(ctx, &connexity, edge, &group);
            if let Some(new) = recover(found, edge)? {
                for interference in &new {
                    debug!(%edge, ?interference, "face interference added");
                }
                extra.extend(new);
            }
        }
        if extra.is_empty() {
            continue;
        }
        added += extra.len();
        list.extend(extra);
        ctx.ds.replace(edge, list)?;
    }
    Ok(added)
}

fn complete_group<K: GeometryKernel>(
    ctx: &mut PassContext<'_, K>,
    connexity: &Connexity,
    edge: ShapeIndex,
    group: &[Interference],
) -> Result<Vec<Interference>> {
    let mut new = Vec::new();
    let geometry = group[0].geometry;
    if !matches!(geometry.kind(), GeometryKind::Point | GeometryKind::Vertex)
        || bounds_edge(ctx, &geometry, edge)?
    {
        return Ok(new);
    }

    let on_faces = select(group, &[Selector::OwnerKind(ShapeKind::Face)], ctx.ds.registry());
    let face_level = select(&on_faces, &[Selector::SupportKind(SupportKind::Face)], ctx.ds.registry());
    if face_level.len() > 1 {
        return Ok(new);
    }
    let edge_level = select(&on_faces, &[Selector::SupportKind(SupportKind::Edge)], ctx.ds.registry());
    let Some(first) = edge_level.first() else {
        return Ok(new);
    };
    let Some(parameter) = first.parameter() else {
        return Ok(new);
    };
    let Some(at) = ctx.locate(&geometry)? else {
        return Ok(new);
    };
    let tolerance = ctx.tolerance_of(&geometry);
    let support = first.support.index();
    let support_id = ctx.ds.registry().edge_id(support)?;
    let edge_id = ctx.ds.registry().edge_id(edge)?;
    let sharing = connexity.faces_of(ctx.ds, ctx.kernel, edge)?;

    let connected: Vec<ShapeIndex> = ctx
        .kernel
        .boundary_adjacent_faces(support_id)
        .into_iter()
        .filter_map(|f| ctx.ds.registry().index_of(f.into()))
        .collect();
    for face in connected {
        if face == first.owner() || group.iter().chain(&new).any(|i| i.owner() == face) {
            continue;
        }
        let on_support = match geometry {
            Geometry::Vertex { index, .. } => {
                let vertex = ctx.ds.registry().vertex_id(index)?;
                ctx.kernel.vertex_parameter(vertex, support_id)
            }
            _ => None,
        };
        let support_parameter = match on_support {
            Some(t) => t,
            None => {
                let projection = ctx.kernel.project_on_edge(&at, support_id)?;
                if projection.distance > tolerance {
                    trace!(%edge, %support, "point is off the support edge");
                    continue;
                }
                projection.parameter
            }
        };
        let face_id = ctx.ds.registry().face_id(face)?;
        let support_point = ctx.kernel.evaluate(support_id, support_parameter)?;
        let curve_point = ctx.kernel.evaluate(edge_id, parameter)?;
        let on_face = ctx.kernel.project_on_face(&support_point, face_id)?;
        let curve_on_face = ctx.kernel.project_on_face(&curve_point, face_id)?;
        if on_face.distance > tolerance || curve_on_face.distance > ctx.tolerances.distance {
            trace!(%edge, %face, "point is off the connected face");
            continue;
        }

        let query = TransitionQuery {
            edge,
            parameter,
            bounds: local_interval(ctx.ds, ctx.kernel, edge, parameter)?,
            face,
            rest: Some((support, support_parameter)),
        };
        let transition = ctx.resolve(&query, &sharing)?;
        new.push(Interference::new(geometry, Support::Face(face), transition));
    }
    Ok(new)
}

/// Returns `true` if the geometry is a vertex bounding `edge`.
fn bounds_edge<K: GeometryKernel>(
    ctx: &PassContext<'_, K>,
    geometry: &Geometry,
    edge: ShapeIndex,
) -> Result<bool> {
    let Geometry::Vertex { index, is_bound, .. } = *geometry else {
        return Ok(false);
    };
    if is_bound {
        return Ok(true);
    }
    let vertex = ctx.ds.registry().vertex_id(index)?;
    let edge = ctx.ds.registry().edge_id(edge)?;
    Ok(ctx.kernel.vertex_parameter(vertex, edge).is_some())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::boolean::fixtures::{oriented, Scene};
    use crate::operations::boolean::{Orientation, Rank};

    /// Box `b` pokes out of the unit box `a` through its `x = 1` face. The
    /// section edge runs along the bottom of `b` on that face, between the
    /// two bottom edges of `b` running in x.
    struct PokeThrough {
        scene: Scene,
        edge: ShapeIndex,
        b_ymin: ShapeIndex,
        b_ymax: ShapeIndex,
        b_zmin: ShapeIndex,
    }

    fn poke_through() -> PokeThrough {
        let mut scene = Scene::new();
        let a = scene.add_box([0.0; 3], [1.0; 3], Rank::First);
        let b = scene.add_box([0.5, 0.25, 0.25], [1.5, 0.75, 0.75], Rank::Second);
        let edge = scene.section([1.0, 0.25, 0.25], [1.0, 0.75, 0.25], Rank::First);
        let (a_xmax, b_zmin) = (scene.face(a, 1), scene.face(b, 4));
        scene.split_on(a_xmax, edge, b_zmin);
        scene.split_on(b_zmin, edge, a_xmax);
        for (at, parameter, from, to) in [
            ([1.0, 0.25, 0.25], 0.0, [0.5, 0.25, 0.25], [1.5, 0.25, 0.25]),
            ([1.0, 0.75, 0.25], 0.5, [0.5, 0.75, 0.25], [1.5, 0.75, 0.25]),
        ] {
            let g = scene.point(at, parameter);
            let support = scene.edge(from, to);
            let crossing = oriented(Orientation::Forward, b_zmin);
            scene.add(edge, Interference::new(g, Support::Edge(support), crossing));
        }
        PokeThrough {
            edge,
            b_ymin: scene.face(b, 2),
            b_ymax: scene.face(b, 3),
            b_zmin,
            scene,
        }
    }

    fn face_level(scene: &Scene, edge: ShapeIndex) -> Vec<Interference> {
        scene
            .list(edge)
            .into_iter()
            .filter(|i| i.support.kind() == SupportKind::Face)
            .collect()
    }

    #[test]
    fn side_faces_of_the_crossed_edges_are_added() {
        let PokeThrough {
            mut scene,
            edge,
            b_ymin,
            b_ymax,
            ..
        } = poke_through();

        assert_eq!(complete_connected(&mut scene.ctx()).unwrap(), 2);
        let added = face_level(&scene, edge);
        assert_eq!(added.len(), 2);

        let entering = added.iter().find(|i| i.support == Support::Face(b_ymin)).unwrap();
        assert_eq!(entering.parameter(), Some(0.0));
        assert_eq!(entering.owner(), b_ymin);
        assert_eq!(entering.orientation(), Some(Orientation::Forward));

        let leaving = added.iter().find(|i| i.support == Support::Face(b_ymax)).unwrap();
        assert_eq!(leaving.parameter(), Some(0.5));
        assert_eq!(leaving.orientation(), Some(Orientation::Reversed));

        assert_eq!(complete_connected(&mut scene.ctx()).unwrap(), 0);
        assert_eq!(scene.list(edge).len(), 4);
    }

    #[test]
    fn existing_face_interference_is_respected() {
        let PokeThrough {
            mut scene,
            edge,
            b_ymin,
            b_ymax,
            ..
        } = poke_through();
        let g = scene.list(edge)[0].geometry;
        scene.add(
            edge,
            Interference::new(g, Support::Face(b_ymin), oriented(Orientation::Forward, b_ymin)),
        );

        assert_eq!(complete_connected(&mut scene.ctx()).unwrap(), 1);
        let added = face_level(&scene, edge);
        assert_eq!(added.len(), 2);
        assert!(added.iter().any(|i| i.support == Support::Face(b_ymax)));
    }

    #[test]
    fn bounding_vertex_is_skipped() {
        let PokeThrough {
            mut scene,
            edge,
            b_zmin,
            ..
        } = poke_through();
        let registry = scene.ds.registry();
        let vertex = registry
            .indices()
            .find(|&i| registry.kind(i).unwrap() == ShapeKind::Vertex)
            .unwrap();
        let support = scene.edge([0.5, 0.25, 0.25], [1.5, 0.25, 0.25]);
        let at_vertex = Geometry::Vertex {
            index: vertex,
            parameter: Some(0.0),
            is_bound: true,
        };
        scene.ds.replace(
            edge,
            vec![Interference::new(
                at_vertex,
                Support::Edge(support),
                oriented(Orientation::Forward, b_zmin),
            )],
        )
        .unwrap();

        assert_eq!(complete_connected(&mut scene.ctx()).unwrap(), 0);
        assert_eq!(scene.list(edge).len(), 1);
    }
}
