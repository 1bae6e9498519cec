use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// A closed volume bounded by faces.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// The faces bounding the solid.
    pub faces: Vec<FaceId>,
}
