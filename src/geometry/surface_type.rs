/// Canonical surface family of a face, as reported by the geometry kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    Plane,
    Cylinder,
    Cone,
    Sphere,
    Torus,
    /// Free-form or otherwise unrecognized surface.
    Other,
}

impl SurfaceType {
    /// Returns `true` for the analytic families the same-domain test understands.
    #[must_use]
    pub fn is_canonical(self) -> bool {
        !matches!(self, Self::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_is_not_canonical() {
        assert!(SurfaceType::Torus.is_canonical());
        assert!(!SurfaceType::Other.is_canonical());
    }
}
