//! Interference tracking and transition resolution between two operands.
//!
//! The [`BooleanSession`] owns a [`BooleanDs`]: a [`ShapeRegistry`] of both
//! operands' shapes plus the section edges, the interference lists of each
//! shape, and the tables of computed points and curves. Once the
//! intersection step has filled it, the purge pass and three completion
//! passes make the section edges' interferences consistent for the
//! reconstruction of the result.

mod complete_connex;
mod complete_sdm;
mod complete_tangent;
mod connexity;
mod ds;
mod engine;
mod interference;
mod pass;
mod purge;
mod registry;
mod same_domain;
mod select;
mod store;
mod transition;

#[cfg(test)]
mod fixtures;

pub use connexity::{has_split_on, owner_has_split_of, Connexity};
pub use ds::{BooleanDs, DsCurve, DsPoint};
pub use engine::{BooleanSession, PassReport};
pub use interference::{
    CurveIndex, Geometry, GeometryKey, GeometryKind, Interference, Orientation, PointIndex,
    ShapeIndex, State, Support, SupportKind, Transition,
};
pub use registry::{Rank, ShapeRegistry};
pub use same_domain::SameDomainDetector;
pub use select::{any, group_by_geometry, select, Selector};
pub use store::InterferenceStore;
pub use transition::{local_interval, TransitionQuery, TransitionResolver};
