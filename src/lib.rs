//! Interference data structure for B-Rep boolean operations.
//!
//! Both operands live in a [`topology::TopologyStore`]. A
//! [`BooleanSession`] registers their shapes, receives the interferences
//! found by the intersection step, and runs the purge and completion passes
//! that leave every section edge with a consistent list.
//!
//! ```
//! use boolean_ds::operations::creation::MakeBox;
//! use boolean_ds::math::Point3;
//! use boolean_ds::topology::TopologyStore;
//! use boolean_ds::{BooleanSession, Rank, Tolerances};
//!
//! # fn main() -> boolean_ds::error::Result<()> {
//! let mut store = TopologyStore::new();
//! let a = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)).execute(&mut store)?;
//! let b = MakeBox::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0)).execute(&mut store)?;
//!
//! let mut session = BooleanSession::new(&store, Tolerances::default());
//! session.register_all(store.explore_solid(a)?, Rank::First);
//! session.register_all(store.explore_solid(b)?, Rank::Second);
//!
//! let report = session.run_purge_and_completion()?;
//! assert!(report.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use config::Tolerances;
pub use error::{DsError, Result};
pub use operations::boolean::{
    BooleanDs, BooleanSession, Geometry, Interference, Orientation, PassReport, Rank, ShapeIndex,
    State, Support, Transition,
};
