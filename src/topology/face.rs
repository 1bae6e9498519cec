use crate::geometry::surface::{Cylinder, Plane, Sphere, Surface};

use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// The geometric surface associated with a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    Plane(Plane),
    Cylinder(Cylinder),
    Sphere(Sphere),
}

impl FaceSurface {
    /// Borrows the surface through the [`Surface`] trait.
    #[must_use]
    pub fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Plane(plane) => plane,
            Self::Cylinder(cylinder) => cylinder,
            Self::Sphere(sphere) => sphere,
        }
    }
}

/// A bounded region of a surface.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// Boundary edges, in no particular order.
    pub edges: Vec<EdgeId>,
    /// If `true`, the face normal agrees with the surface normal.
    pub same_sense: bool,
}
