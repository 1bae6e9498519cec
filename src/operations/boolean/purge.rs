use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::topology::GeometryKernel;

use super::connexity::owner_has_split_of;
use super::ds::BooleanDs;
use super::interference::{Interference, Orientation, ShapeIndex, Support, SupportKind};
use super::pass::PassContext;

/// Drops crossing face interferences of section edges that only restate how
/// the edge lies on a face.
///
/// A `Forward`/`Reversed` interference against face `F` is redundant when
/// its owner face carries the edge as a split, or when `F` is same-domain
/// with a face the edge is connected to. A face crossing paired with an
/// edge crossing of the same owner, point and transition records how the
/// edge crosses that face's boundary and is kept. Degenerated edges are
/// left alone. Returns the number of removed interferences.
#[instrument(skip_all)]
pub(super) fn purge<K: GeometryKernel>(ctx: &mut PassContext<'_, K>) -> Result<usize> {
    let connexity = ctx.connexity();
    let mut removed = 0;
    for edge in ctx.section_edges() {
        if ctx.kernel.is_degenerated(ctx.ds.registry().edge_id(edge)?) {
            trace!(%edge, "degenerated section edge skipped");
            continue;
        }
        let faces = connexity.faces_of(ctx.ds, ctx.kernel, edge)?;
        let list = ctx.ds.interferences_of(edge)?.to_vec();
        let (kept, dropped): (Vec<Interference>, Vec<Interference>) = list
            .iter()
            .copied()
            .partition(|i| {
                !is_redundant(ctx.ds, &faces, edge, i) || crosses_boundary(&list, i)
            });
        if dropped.is_empty() {
            continue;
        }
        for interference in &dropped {
            debug!(%edge, ?interference, "redundant interference purged");
        }
        removed += dropped.len();
        ctx.ds.replace(edge, kept)?;
    }
    Ok(removed)
}

fn is_redundant(
    ds: &BooleanDs,
    connected: &[ShapeIndex],
    edge: ShapeIndex,
    interference: &Interference,
) -> bool {
    let Support::Face(support) = interference.support else {
        return false;
    };
    if !interference
        .orientation()
        .is_some_and(Orientation::is_crossing)
    {
        return false;
    }
    if owner_has_split_of(ds, interference, edge) {
        return true;
    }
    ds.registry()
        .same_domain(support)
        .is_ok_and(|group| group.iter().any(|face| connected.contains(face)))
}

/// Returns `true` if `list` has an edge crossing matching the face crossing.
fn crosses_boundary(list: &[Interference], interference: &Interference) -> bool {
    list.iter().any(|other| {
        other.support.kind() == SupportKind::Edge
            && other.geometry == interference.geometry
            && other.transition == interference.transition
    })
}
