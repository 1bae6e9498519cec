use std::fmt;

use super::edge::EdgeId;
use super::face::FaceId;
use super::solid::SolidId;
use super::vertex::VertexId;

/// Topological type of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Face,
    Solid,
}

/// A handle to any shape of the topology store.
///
/// Two handles are equal exactly when they name the same arena entry, so
/// registering the same handle twice is recognized as the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRef {
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
    Solid(SolidId),
}

impl ShapeRef {
    /// Returns the topological type of the shape.
    #[must_use]
    pub fn kind(self) -> ShapeKind {
        match self {
            Self::Vertex(_) => ShapeKind::Vertex,
            Self::Edge(_) => ShapeKind::Edge,
            Self::Face(_) => ShapeKind::Face,
            Self::Solid(_) => ShapeKind::Solid,
        }
    }

    /// Returns the edge id if this is an edge.
    #[must_use]
    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            Self::Edge(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the face id if this is a face.
    #[must_use]
    pub fn as_face(self) -> Option<FaceId> {
        match self {
            Self::Face(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the vertex id if this is a vertex.
    #[must_use]
    pub fn as_vertex(self) -> Option<VertexId> {
        match self {
            Self::Vertex(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
            Self::Face => "face",
            Self::Solid => "solid",
        };
        f.write_str(name)
    }
}

impl From<VertexId> for ShapeRef {
    fn from(id: VertexId) -> Self {
        Self::Vertex(id)
    }
}

impl From<EdgeId> for ShapeRef {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

impl From<FaceId> for ShapeRef {
    fn from(id: FaceId) -> Self {
        Self::Face(id)
    }
}

impl From<SolidId> for ShapeRef {
    fn from(id: SolidId) -> Self {
        Self::Solid(id)
    }
}
