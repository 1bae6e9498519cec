pub mod edge;
pub mod face;
mod kernel;
pub mod shape;
pub mod solid;
pub mod vertex;

pub use edge::{EdgeCurve, EdgeData, EdgeId};
pub use face::{FaceData, FaceId, FaceSurface};
pub use kernel::GeometryKernel;
pub use shape::{ShapeKind, ShapeRef};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};

use crate::error::TopologyError;
use slotmap::{SecondaryMap, SlotMap};

/// Central arena that owns the topological entities of both operands.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures. The store also keeps the
/// edge-to-face adjacency needed by the interference passes.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    solids: SlotMap<SolidId, SolidData>,
    edge_faces: SecondaryMap<EdgeId, Vec<FaceId>>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Faces bounded by the edge, in insertion order.
    #[must_use]
    pub fn faces_of_edge(&self, id: EdgeId) -> &[FaceId] {
        self.edge_faces.get(id).map_or(&[][..], Vec::as_slice)
    }

    // --- Face operations ---

    /// Inserts a face, records it as adjacent to each of its edges and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        let edges = data.edges.clone();
        let id = self.faces.insert(data);
        for edge in edges {
            if let Some(entry) = self.edge_faces.entry(edge) {
                entry.or_default().push(id);
            }
        }
        id
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    /// All sub-shapes of a solid: its faces, their edges and the edges' vertices.
    ///
    /// Shared sub-shapes are listed once, in first-visit order.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced entity is missing.
    pub fn explore_solid(&self, id: SolidId) -> Result<Vec<ShapeRef>, TopologyError> {
        let mut seen = std::collections::HashSet::new();
        let mut shapes = vec![ShapeRef::Solid(id)];
        for &face_id in &self.solid(id)?.faces {
            shapes.push(ShapeRef::Face(face_id));
            for &edge_id in &self.face(face_id)?.edges {
                if !seen.insert(ShapeRef::Edge(edge_id)) {
                    continue;
                }
                shapes.push(ShapeRef::Edge(edge_id));
                let edge = self.edge(edge_id)?;
                for vertex in [edge.start, edge.end] {
                    if seen.insert(ShapeRef::Vertex(vertex)) {
                        shapes.push(ShapeRef::Vertex(vertex));
                    }
                }
            }
        }
        Ok(shapes)
    }
}
