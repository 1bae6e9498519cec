use tracing::{debug, instrument};

use crate::error::Result;
use crate::math::Point3;
use crate::topology::{GeometryKernel, ShapeKind};

use super::connexity::{has_split_on, owner_has_split_of, Connexity};
use super::interference::{Interference, ShapeIndex, SupportKind};
use super::pass::{recover, PassContext};
use super::select::{group_by_geometry, select, Selector};

/// Copies ambiguous edge interferences onto a same-domain face.
///
/// A section edge `SE` may carry an `Internal`/`External` interference at
/// `G` against edge `ES`, owned by a face that has no split of `SE`. If a
/// face connected to `SE` is same-domain with a face `F` connected to `ES`,
/// and `F` does carry a split of `SE`, the interference is repeated with
/// `F` as owner. Groups where `F` already owns an interference are left
/// alone. Returns the number of added interferences.
#[instrument(skip_all)]
pub(super) fn complete_same_domain<K: GeometryKernel>(ctx: &mut PassContext<'_, K>) -> Result<usize> {
    let connexity = ctx.connexity();
    let mut added = 0;
    for edge in ctx.section_edges() {
        let mut list = ctx.ds.interferences_of(edge)?.to_vec();
        let edge_faces = connexity.faces_of(ctx.ds, ctx.kernel, edge)?;
        let mut extra = Vec::new();
        for (_, group) in group_by_geometry(&list) {
            let found = complete_group(ctx, &connexity, &edge_faces, edge, &group);
            if let Some(interference) = recover(found, edge)?.flatten() {
                debug!(%edge, ?interference, "same-domain interference added");
                extra.push(interference);
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
    edge_faces: &[ShapeIndex],
    edge: ShapeIndex,
    group: &[Interference],
) -> Result<Option<Interference>> {
    let candidates = select(
        group,
        &[
            Selector::Ambiguous,
            Selector::OwnerKind(ShapeKind::Face),
            Selector::SupportKind(SupportKind::Edge),
        ],
        ctx.ds.registry(),
    );
    if candidates.is_empty() || candidates.iter().any(|i| owner_has_split_of(ctx.ds, i, edge)) {
        return Ok(None);
    }
    let at = ctx.locate(&group[0].geometry)?;

    for interference in &candidates {
        let support_faces = connexity.faces_of(ctx.ds, ctx.kernel, interference.support.index())?;
        let Some(target) = same_domain_partner(ctx, edge_faces, &support_faces, at.as_ref())? else {
            continue;
        };
        if !has_split_on(ctx.ds, target, edge) {
            continue;
        }
        if group.iter().any(|i| i.owner() == target) {
            return Ok(None);
        }
        return Ok(Some(Interference {
            transition: interference.transition.with_owner(target),
            ..*interference
        }));
    }
    Ok(None)
}

/// A face of `theirs` same-domain with some face of `ours`.
///
/// Without a sample point only recorded groups are consulted.
fn same_domain_partner<K: GeometryKernel>(
    ctx: &mut PassContext<'_, K>,
    ours: &[ShapeIndex],
    theirs: &[ShapeIndex],
    at: Option<&Point3>,
) -> Result<Option<ShapeIndex>> {
    for &mine in ours {
        for &other in theirs {
            if mine == other {
                continue;
            }
            let same = match at {
                Some(at) => ctx
                    .detector
                    .is_same_domain(ctx.ds.registry_mut(), ctx.kernel, mine, other, at)?,
                None => ctx.ds.registry().same_domain(mine)?.contains(&other),
            };
            if same {
                return Ok(Some(other));
            }
        }
    }
    Ok(None)
}
