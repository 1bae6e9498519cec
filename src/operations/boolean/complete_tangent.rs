use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::topology::{GeometryKernel, ShapeKind};

use super::connexity::owner_has_split_of;
use super::interference::{GeometryKind, Interference, Orientation, ShapeIndex, Support, SupportKind};
use super::pass::{recover, PassContext};
use super::select::{any, group_by_geometry, select, Selector};
use super::transition::TransitionQuery;

/// Replaces ambiguous transitions of a section edge lying on a face by a
/// crossing of that face's boundary, when one can be computed.
///
/// At a point `G` the edge carries `Internal`/`External` interferences owned
/// by a face `F` that has a split of the edge: one against `F` itself and
/// one against a boundary edge `ES` of `F`. The transition is recomputed by
/// following the edge across `ES` inside `F`. Only a `Forward`/`Reversed`
/// result is used: the interferences owned by `F` at `G` are then replaced
/// by a face and an edge interference carrying it. Returns the number of
/// rewritten geometry groups.
#[instrument(skip_all)]
pub(super) fn complete_tangent<K: GeometryKernel>(ctx: &mut PassContext<'_, K>) -> Result<usize> {
    let connexity = ctx.connexity();
    let mut rewritten = 0;
    for edge in ctx.section_edges() {
        let list = ctx.ds.interferences_of(edge)?.to_vec();
        let sharing = connexity.faces_of(ctx.ds, ctx.kernel, edge)?;
        let mut rebuilt = Vec::with_capacity(list.len());
        let mut changed = false;
        for (_, group) in group_by_geometry(&list) {
            let found = retransition(ctx, &sharing, edge, &group);
            match recover(found, edge)?.flatten() {
                Some(new_group) => {
                    changed = true;
                    rewritten += 1;
                    rebuilt.extend(new_group);
                }
                None => rebuilt.extend(group),
            }
        }
        if changed {
            ctx.ds.replace(edge, rebuilt)?;
        }
    }
    Ok(rewritten)
}

fn retransition<K: GeometryKernel>(
    ctx: &mut PassContext<'_, K>,
    sharing: &[ShapeIndex],
    edge: ShapeIndex,
    group: &[Interference],
) -> Result<Option<Vec<Interference>>> {
    let geometry = group[0].geometry;
    if geometry.kind() != GeometryKind::Point {
        return Ok(None);
    }
    let registry = ctx.ds.registry();
    let ambiguous = select(
        group,
        &[Selector::Ambiguous, Selector::OwnerKind(ShapeKind::Face)],
        registry,
    );
    if !ambiguous.iter().any(|i| owner_has_split_of(ctx.ds, i, edge)) {
        return Ok(None);
    }
    let face_level = select(&ambiguous, &[Selector::SupportKind(SupportKind::Face)], registry);
    let Some(face) = face_level.first().map(|i| i.support.index()) else {
        return Ok(None);
    };
    let edge_level = select(
        &ambiguous,
        &[Selector::SupportKind(SupportKind::Edge), Selector::Owner(face)],
        registry,
    );
    let Some(on_boundary) = edge_level.first() else {
        return Ok(None);
    };
    if any(group, &[Selector::Crossing, Selector::Owner(face)], registry) {
        return Ok(None);
    }
    let Some(parameter) = on_boundary.parameter() else {
        return Ok(None);
    };

    let boundary = on_boundary.support.index();
    let boundary_id = registry.edge_id(boundary)?;
    let edge_id = registry.edge_id(edge)?;
    let face_id = registry.face_id(face)?;
    let point = ctx.kernel.evaluate(edge_id, parameter)?;
    if !ctx.tolerances.is_coincident(ctx.kernel.project_on_face(&point, face_id)?.distance) {
        trace!(%edge, %face, "point is off the face");
        return Ok(None);
    }
    let query = TransitionQuery {
        edge,
        parameter,
        bounds: ctx.kernel.edge_bounds(edge_id)?,
        face,
        rest: Some((boundary, ctx.kernel.project_on_edge(&point, boundary_id)?.parameter)),
    };
    let transition = ctx.resolve(&query, sharing)?;
    if !transition.orientation().is_some_and(Orientation::is_crossing) {
        trace!(%edge, %face, "transition stays ambiguous");
        return Ok(None);
    }

    let mut rebuilt = vec![
        Interference::new(geometry, Support::Face(face), transition),
        Interference::new(geometry, Support::Edge(boundary), transition),
    ];
    rebuilt.extend(group.iter().filter(|i| i.owner() != face).copied());
    debug!(%edge, %face, ?transition, "ambiguous transition replaced");
    Ok(Some(rebuilt))
}
