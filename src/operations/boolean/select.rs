//! Filters and grouping over interference lists.

use std::collections::BTreeMap;

use crate::topology::ShapeKind;

use super::interference::{
    GeometryKey, GeometryKind, Interference, Orientation, ShapeIndex, SupportKind,
};
use super::registry::ShapeRegistry;

/// One criterion an interference may be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    SupportKind(SupportKind),
    GeometryKind(GeometryKind),
    /// Geometry is exactly this registered shape.
    GeometryShape(ShapeIndex),
    Owner(ShapeIndex),
    /// Owner is a registered shape of this kind.
    OwnerKind(ShapeKind),
    Orientation(Orientation),
    /// Transition is forward or reversed.
    Crossing,
    /// Transition is internal or external.
    Ambiguous,
    /// Geometry or support is this shape.
    InterferesWith(ShapeIndex),
}

impl Selector {
    /// Returns `true` if the interference passes this filter.
    ///
    /// Owners missing from the registry never match [`Selector::OwnerKind`].
    #[must_use]
    pub fn matches(self, interference: &Interference, registry: &ShapeRegistry) -> bool {
        match self {
            Self::SupportKind(kind) => interference.support.kind() == kind,
            Self::GeometryKind(kind) => interference.geometry.kind() == kind,
            Self::GeometryShape(shape) => interference.geometry.shape() == Some(shape),
            Self::Owner(owner) => interference.owner() == owner,
            Self::OwnerKind(kind) => registry
                .kind(interference.owner())
                .is_ok_and(|k| k == kind),
            Self::Orientation(o) => interference.orientation() == Some(o),
            Self::Crossing => interference.orientation().is_some_and(Orientation::is_crossing),
            Self::Ambiguous => interference
                .orientation()
                .is_some_and(Orientation::is_ambiguous),
            Self::InterferesWith(shape) => interference.interferes_with(shape),
        }
    }
}

/// Interferences matching every selector, in list order.
#[must_use]
pub fn select(
    list: &[Interference],
    selectors: &[Selector],
    registry: &ShapeRegistry,
) -> Vec<Interference> {
    list.iter()
        .filter(|i| selectors.iter().all(|s| s.matches(i, registry)))
        .copied()
        .collect()
}

/// Returns `true` if any interference matches every selector.
#[must_use]
pub fn any(list: &[Interference], selectors: &[Selector], registry: &ShapeRegistry) -> bool {
    list.iter()
        .any(|i| selectors.iter().all(|s| s.matches(i, registry)))
}

/// Splits a list into groups sharing the same geometry.
///
/// Groups come out in ascending `(kind, index)` order; each group keeps the
/// relative order of the input list.
#[must_use]
pub fn group_by_geometry(list: &[Interference]) -> Vec<(GeometryKey, Vec<Interference>)> {
    let mut groups: BTreeMap<GeometryKey, Vec<Interference>> = BTreeMap::new();
    for interference in list {
        groups
            .entry(interference.geometry.key())
            .or_default()
            .push(*interference);
    }
    groups.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::boolean::{Geometry, PointIndex, State, Support, Transition};

    fn at_point(point: u32, support: Support, transition: Transition) -> Interference {
        Interference::new(
            Geometry::Point {
                index: PointIndex(point),
                parameter: Some(f64::from(point)),
            },
            support,
            transition,
        )
    }

    #[test]
    fn grouping_is_ordered_and_stable() {
        let f = ShapeIndex(1);
        let a = at_point(2, Support::Face(f), Transition::unknown(f));
        let b = at_point(1, Support::Edge(ShapeIndex(2)), Transition::unknown(f));
        let c = at_point(2, Support::Edge(ShapeIndex(3)), Transition::unknown(f));
        let groups = group_by_geometry(&[a, b, c]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1, vec![b]);
        assert_eq!(groups[1].1, vec![a, c]);
    }

    #[test]
    fn selectors_combine_conjunctively() {
        let registry = ShapeRegistry::new(8);
        let f = ShapeIndex(1);
        let crossing = at_point(1, Support::Face(f), Transition::oriented(Orientation::Forward, f));
        let tangent = at_point(1, Support::Edge(ShapeIndex(2)), Transition::oriented(Orientation::Internal, f));
        let odd = at_point(1, Support::Face(f), Transition::new(State::On, State::On, f));
        let list = [crossing, tangent, odd];

        assert_eq!(select(&list, &[Selector::Crossing], &registry), vec![crossing]);
        assert_eq!(
            select(&list, &[Selector::SupportKind(SupportKind::Face)], &registry),
            vec![crossing, odd]
        );
        assert_eq!(
            select(&list, &[Selector::Ambiguous, Selector::SupportKind(SupportKind::Face)], &registry),
            Vec::<Interference>::new()
        );
        assert!(any(&list, &[Selector::InterferesWith(ShapeIndex(2))], &registry));
        // owner 1 is not registered here
        assert!(!any(&list, &[Selector::OwnerKind(ShapeKind::Face)], &registry));
    }
}
