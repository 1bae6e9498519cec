//! Dense indexing of the shapes taking part in a boolean operation.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{OperationError, Result, TopologyError};
use crate::topology::{EdgeId, FaceId, ShapeKind, ShapeRef, VertexId};

use super::interference::ShapeIndex;

/// Which input operand a shape descends from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    First = 1,
    Second = 2,
}

#[derive(Debug, Clone)]
struct Entry {
    shape: ShapeRef,
    rank: Rank,
    same_domain: BTreeSet<ShapeIndex>,
}

/// Maps shapes to dense indices and keeps the per-shape bookkeeping the
/// passes rely on: operand rank, same-domain group and section edges.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    entries: Vec<Entry>,
    indices: HashMap<ShapeRef, ShapeIndex>,
    section_edges: Vec<ShapeIndex>,
    section_edge_set: HashSet<ShapeIndex>,
    fanout_limit: usize,
}

impl ShapeRegistry {
    /// Creates an empty registry whose same-domain groups may grow to `fanout_limit`.
    #[must_use]
    pub fn new(fanout_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            indices: HashMap::new(),
            section_edges: Vec::new(),
            section_edge_set: HashSet::new(),
            fanout_limit,
        }
    }

    /// Registers a shape and returns its index.
    ///
    /// Registering a shape twice returns the original index and keeps its
    /// original rank.
    pub fn register(&mut self, shape: ShapeRef, rank: Rank) -> ShapeIndex {
        if let Some(&index) = self.indices.get(&shape) {
            return index;
        }
        let raw = u32::try_from(self.entries.len() + 1).unwrap_or(u32::MAX);
        let index = ShapeIndex(raw);
        self.entries.push(Entry {
            shape,
            rank,
            same_domain: BTreeSet::new(),
        });
        self.indices.insert(shape, index);
        index
    }

    /// Registers an edge produced by face/face intersection as a section edge.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is already registered as an operand edge.
    pub fn register_section_edge(&mut self, edge: EdgeId, rank: Rank) -> Result<ShapeIndex> {
        let shape = ShapeRef::Edge(edge);
        if let Some(&index) = self.indices.get(&shape) {
            if self.section_edge_set.contains(&index) {
                return Ok(index);
            }
            return Err(OperationError::InvalidInput(format!(
                "edge {index} is an operand edge, not a section edge"
            ))
            .into());
        }
        let index = self.register(shape, rank);
        self.section_edges.push(index);
        self.section_edge_set.insert(index);
        Ok(index)
    }

    /// Number of registered shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered indices, ascending.
    pub fn indices(&self) -> impl Iterator<Item = ShapeIndex> + '_ {
        (1..=self.entries.len()).filter_map(|i| u32::try_from(i).ok().map(ShapeIndex))
    }

    /// Index of an already registered shape.
    #[must_use]
    pub fn index_of(&self, shape: ShapeRef) -> Option<ShapeIndex> {
        self.indices.get(&shape).copied()
    }

    fn entry(&self, index: ShapeIndex) -> Result<&Entry> {
        self.entries
            .get(index.slot())
            .ok_or_else(|| TopologyError::ShapeNotRegistered(index.get()).into())
    }

    /// Returns `true` if `index` names a registered shape.
    #[must_use]
    pub fn contains(&self, index: ShapeIndex) -> bool {
        index.get() >= 1 && index.slot() < self.entries.len()
    }

    /// The shape behind an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is not registered.
    pub fn shape(&self, index: ShapeIndex) -> Result<ShapeRef> {
        Ok(self.entry(index)?.shape)
    }

    /// Topological type of a registered shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is not registered.
    pub fn kind(&self, index: ShapeIndex) -> Result<ShapeKind> {
        Ok(self.shape(index)?.kind())
    }

    /// Operand the shape descends from.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is not registered.
    pub fn ancestor_rank(&self, index: ShapeIndex) -> Result<Rank> {
        Ok(self.entry(index)?.rank)
    }

    /// # Errors
    ///
    /// Returns an error if the index is not registered or is not an edge.
    pub fn edge_id(&self, index: ShapeIndex) -> Result<EdgeId> {
        self.shape(index)?
            .as_edge()
            .ok_or_else(|| wrong_kind(index, ShapeKind::Edge))
    }

    /// # Errors
    ///
    /// Returns an error if the index is not registered or is not a face.
    pub fn face_id(&self, index: ShapeIndex) -> Result<FaceId> {
        self.shape(index)?
            .as_face()
            .ok_or_else(|| wrong_kind(index, ShapeKind::Face))
    }

    /// # Errors
    ///
    /// Returns an error if the index is not registered or is not a vertex.
    pub fn vertex_id(&self, index: ShapeIndex) -> Result<VertexId> {
        self.shape(index)?
            .as_vertex()
            .ok_or_else(|| wrong_kind(index, ShapeKind::Vertex))
    }

    /// Shapes known to share the underlying geometry of `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is not registered.
    pub fn same_domain(&self, index: ShapeIndex) -> Result<&BTreeSet<ShapeIndex>> {
        Ok(&self.entry(index)?.same_domain)
    }

    /// Returns `true` if `index` has at least one same-domain partner.
    #[must_use]
    pub fn has_same_domain(&self, index: ShapeIndex) -> bool {
        self.same_domain(index).is_ok_and(|group| !group.is_empty())
    }

    /// Records that `a` and `b` share their underlying geometry.
    ///
    /// The relation is kept symmetric. Linking a shape to itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is unregistered, or if the link would
    /// grow a group past the fan-out limit.
    pub fn add_same_domain(&mut self, a: ShapeIndex, b: ShapeIndex) -> Result<()> {
        self.entry(a)?;
        self.entry(b)?;
        if a == b {
            return Ok(());
        }
        for (x, y) in [(a, b), (b, a)] {
            let group = &self.entries[x.slot()].same_domain;
            if !group.contains(&y) && group.len() >= self.fanout_limit {
                return Err(OperationError::SameDomainOverflow {
                    index: x.get(),
                    size: group.len() + 1,
                    limit: self.fanout_limit,
                }
                .into());
            }
        }
        self.entries[a.slot()].same_domain.insert(b);
        self.entries[b.slot()].same_domain.insert(a);
        Ok(())
    }

    /// Section edges, in registration order.
    ///
    /// The iterator is `Clone`, so a pass may walk it more than once.
    pub fn section_edges(&self) -> impl Iterator<Item = ShapeIndex> + Clone + '_ {
        self.section_edges.iter().copied()
    }

    /// Returns `true` if `index` was registered as a section edge.
    #[must_use]
    pub fn is_section_edge(&self, index: ShapeIndex) -> bool {
        self.section_edge_set.contains(&index)
    }
}

fn wrong_kind(index: ShapeIndex, expected: ShapeKind) -> crate::error::DsError {
    OperationError::InvalidInput(format!("shape {index} is not a {expected}")).into()
}
