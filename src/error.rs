use thiserror::Error;

/// Top-level error type for the boolean data structure.
#[derive(Debug, Error)]
pub enum DsError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl DsError {
    /// Returns `true` if the error must abort the whole boolean operation.
    ///
    /// Geometry errors (degenerate tangents, projections that do not land)
    /// only invalidate the interference being processed; lookups of
    /// unregistered shapes and precondition violations are caller bugs.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Geometry(_))
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("projection failed: {0}")]
    ProjectionFailed(String),
}

/// Errors related to shape lookups.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("shape {0} is not registered")]
    ShapeNotRegistered(u32),

    #[error("geometry {0} is not registered")]
    GeometryNotRegistered(String),
}

/// Errors raised by the interference passes.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("precondition violation: {0}")]
    PreconditionViolation(String),

    #[error("same-domain group of shape {index} has {size} members (limit {limit})")]
    SameDomainOverflow { index: u32, size: usize, limit: usize },
}

/// Convenience type alias for results using [`DsError`].
pub type Result<T> = std::result::Result<T, DsError>;
