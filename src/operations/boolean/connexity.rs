//! Which faces an edge is connected to.

use std::collections::HashMap;

use crate::error::Result;
use crate::topology::{GeometryKernel, ShapeKind, ShapeRef};

use super::ds::BooleanDs;
use super::interference::{Geometry, Interference, ShapeIndex};

/// Edge-to-face connexity of a data structure.
///
/// An edge is connected to the faces it bounds in its operand, and to every
/// registered face carrying an interference whose geometry is that edge.
/// The second part is how a section edge becomes connected to the faces it
/// lies on.
#[derive(Debug, Clone, Default)]
pub struct Connexity {
    split_faces: HashMap<ShapeIndex, Vec<ShapeIndex>>,
}

impl Connexity {
    /// Scans the face interference lists of `ds`.
    #[must_use]
    pub fn build(ds: &BooleanDs) -> Self {
        let registry = ds.registry();
        let mut split_faces: HashMap<ShapeIndex, Vec<ShapeIndex>> = HashMap::new();
        for face in registry.indices() {
            if !registry.kind(face).is_ok_and(|k| k == ShapeKind::Face) {
                continue;
            }
            for interference in ds.interferences_of(face).unwrap_or_default() {
                if let Geometry::Edge(edge) = interference.geometry {
                    let faces = split_faces.entry(edge).or_default();
                    if !faces.contains(&face) {
                        faces.push(face);
                    }
                }
            }
        }
        Self { split_faces }
    }

    /// Registered faces connected to `edge`: boundary faces first, then the
    /// faces the edge lies on.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is not a registered edge.
    pub fn faces_of<K: GeometryKernel>(
        &self,
        ds: &BooleanDs,
        kernel: &K,
        edge: ShapeIndex,
    ) -> Result<Vec<ShapeIndex>> {
        let registry = ds.registry();
        let edge_id = registry.edge_id(edge)?;
        let mut faces: Vec<ShapeIndex> = kernel
            .boundary_adjacent_faces(edge_id)
            .into_iter()
            .filter_map(|face| registry.index_of(ShapeRef::Face(face)))
            .collect();
        for &face in self.split_faces.get(&edge).into_iter().flatten() {
            if !faces.contains(&face) {
                faces.push(face);
            }
        }
        Ok(faces)
    }
}

/// Returns `true` if `face` carries an interference whose geometry is `edge`,
/// i.e. `edge` has a split lying on `face`.
#[must_use]
pub fn has_split_on(ds: &BooleanDs, face: ShapeIndex, edge: ShapeIndex) -> bool {
    ds.interferences_of(face)
        .unwrap_or_default()
        .iter()
        .any(|i| i.geometry == Geometry::Edge(edge))
}

/// Returns `true` if the face owning `interference` has a split of `edge`.
#[must_use]
pub fn owner_has_split_of(ds: &BooleanDs, interference: &Interference, edge: ShapeIndex) -> bool {
    let owner = interference.owner();
    ds.registry().kind(owner).is_ok_and(|k| k == ShapeKind::Face) && has_split_on(ds, owner, edge)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::boolean::{Rank, Support, Transition};
    use crate::operations::creation::MakeBox;
    use crate::topology::TopologyStore;

    #[test]
    fn section_edge_is_connected_through_face_splits() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let mut ds = BooleanDs::default();
        for shape in store.explore_solid(solid).unwrap() {
            ds.register(shape, Rank::First);
        }
        let faces = store.solid(solid).unwrap().faces.clone();
        let edge_id = store.face(faces[0]).unwrap().edges[0];
        let edge = ds.registry().index_of(ShapeRef::Edge(edge_id)).unwrap();
        let bottom = ds.registry().index_of(ShapeRef::Face(faces[4])).unwrap();

        let before = Connexity::build(&ds).faces_of(&ds, &store, edge).unwrap();
        assert_eq!(before.len(), 2);

        let split = Interference::new(Geometry::Edge(edge), Support::Face(bottom), Transition::unknown(bottom));
        ds.store_interference(bottom, split).unwrap();
        assert!(has_split_on(&ds, bottom, edge));

        let after = Connexity::build(&ds).faces_of(&ds, &store, edge).unwrap();
        assert_eq!(after.len(), if before.contains(&bottom) { 2 } else { 3 });
        assert!(after.contains(&bottom));
    }
}
