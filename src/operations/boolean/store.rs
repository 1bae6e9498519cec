use super::interference::{Interference, ShapeIndex};

/// Ordered interference lists, one per owner shape.
///
/// This is the raw container; index validation happens in
/// [`BooleanDs`](super::BooleanDs), which is the only writer.
#[derive(Debug, Clone, Default)]
pub struct InterferenceStore {
    lists: Vec<Vec<Interference>>,
}

impl InterferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self, owner: ShapeIndex) -> &mut Vec<Interference> {
        let slot = owner.slot();
        if self.lists.len() <= slot {
            self.lists.resize_with(slot + 1, Vec::new);
        }
        &mut self.lists[slot]
    }

    /// Appends to the owner's list.
    pub fn push(&mut self, owner: ShapeIndex, interference: Interference) {
        self.list_mut(owner).push(interference);
    }

    /// The owner's list in insertion order; empty if nothing was stored.
    #[must_use]
    pub fn interferences_of(&self, owner: ShapeIndex) -> &[Interference] {
        self.lists.get(owner.slot()).map_or(&[][..], Vec::as_slice)
    }

    /// Swaps in a whole new list and returns the previous one.
    pub fn replace(&mut self, owner: ShapeIndex, list: Vec<Interference>) -> Vec<Interference> {
        std::mem::replace(self.list_mut(owner), list)
    }

    /// Total number of stored interferences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }
}
