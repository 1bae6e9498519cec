//! The boolean data structure: registry, geometry tables and interference store.

use crate::error::{OperationError, Result, TopologyError};
use crate::math::Point3;
use crate::topology::{EdgeCurve, EdgeId, ShapeKind, ShapeRef};

use super::interference::{CurveIndex, Geometry, Interference, PointIndex, ShapeIndex, Support};
use super::registry::{Rank, ShapeRegistry};
use super::store::InterferenceStore;

/// A computed intersection point.
#[derive(Debug, Clone, PartialEq)]
pub struct DsPoint {
    pub point: Point3,
    pub tolerance: f64,
}

/// A computed intersection curve.
#[derive(Debug, Clone)]
pub struct DsCurve {
    pub curve: EdgeCurve,
    pub tolerance: f64,
}

/// Everything one boolean operation knows about the contacts between its
/// two operands.
///
/// Interference lists are only ever changed whole: read a list, build the
/// new one, [`replace`](Self::replace) it. The borrow checker keeps a list
/// from being read while it is being replaced:
///
/// ```compile_fail
/// use boolean_ds::operations::boolean::{BooleanDs, ShapeIndex};
///
/// fn stale(ds: &mut BooleanDs, owner: ShapeIndex) -> boolean_ds::error::Result<usize> {
///     let live = ds.interferences_of(owner)?;
///     ds.replace(owner, Vec::new())?;
///     Ok(live.len())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BooleanDs {
    registry: ShapeRegistry,
    store: InterferenceStore,
    points: Vec<DsPoint>,
    curves: Vec<DsCurve>,
}

impl BooleanDs {
    /// Creates an empty data structure.
    #[must_use]
    pub fn new(max_same_domain_fanout: usize) -> Self {
        Self {
            registry: ShapeRegistry::new(max_same_domain_fanout),
            store: InterferenceStore::new(),
            points: Vec::new(),
            curves: Vec::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    /// Registers a shape of one operand. See [`ShapeRegistry::register`].
    pub fn register(&mut self, shape: impl Into<ShapeRef>, rank: Rank) -> ShapeIndex {
        self.registry.register(shape.into(), rank)
    }

    /// Registers a section edge. See [`ShapeRegistry::register_section_edge`].
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is already an operand edge.
    pub fn register_section_edge(&mut self, edge: EdgeId, rank: Rank) -> Result<ShapeIndex> {
        self.registry.register_section_edge(edge, rank)
    }

    /// Adds an intersection point.
    pub fn add_point(&mut self, point: Point3, tolerance: f64) -> PointIndex {
        self.points.push(DsPoint { point, tolerance });
        PointIndex(u32::try_from(self.points.len()).unwrap_or(u32::MAX))
    }

    /// # Errors
    ///
    /// Returns an error if the point index is unknown.
    pub fn point(&self, index: PointIndex) -> Result<&DsPoint> {
        self.points
            .get(index.slot())
            .ok_or_else(|| TopologyError::GeometryNotRegistered(format!("point {index}")).into())
    }

    /// Adds an intersection curve.
    pub fn add_curve(&mut self, curve: EdgeCurve, tolerance: f64) -> CurveIndex {
        self.curves.push(DsCurve { curve, tolerance });
        CurveIndex(u32::try_from(self.curves.len()).unwrap_or(u32::MAX))
    }

    /// # Errors
    ///
    /// Returns an error if the curve index is unknown.
    pub fn curve(&self, index: CurveIndex) -> Result<&DsCurve> {
        self.curves
            .get(index.slot())
            .ok_or_else(|| TopologyError::GeometryNotRegistered(format!("curve {index}")).into())
    }

    /// Appends an interference to the owner's list.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner or any index the interference refers to
    /// is not registered, or if the support's kind does not match its shape.
    pub fn store_interference(&mut self, owner: ShapeIndex, interference: Interference) -> Result<()> {
        self.registry.shape(owner)?;
        self.validate(&interference)?;
        self.store.push(owner, interference);
        Ok(())
    }

    /// The owner's interferences, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner is not registered.
    pub fn interferences_of(&self, owner: ShapeIndex) -> Result<&[Interference]> {
        self.registry.shape(owner)?;
        Ok(self.store.interferences_of(owner))
    }

    /// Replaces the owner's whole list and returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner is unregistered or any new interference
    /// is invalid; the stored list is then left unchanged.
    pub fn replace(&mut self, owner: ShapeIndex, list: Vec<Interference>) -> Result<Vec<Interference>> {
        self.registry.shape(owner)?;
        for interference in &list {
            self.validate(interference)?;
        }
        Ok(self.store.replace(owner, list))
    }

    /// Total number of stored interferences.
    #[must_use]
    pub fn interference_count(&self) -> usize {
        self.store.len()
    }

    fn validate(&self, interference: &Interference) -> Result<()> {
        match interference.geometry {
            Geometry::Point { index, .. } => {
                self.point(index)?;
            }
            Geometry::Curve(index) => {
                self.curve(index)?;
            }
            Geometry::Vertex { index, .. } => self.expect_kind(index, ShapeKind::Vertex)?,
            Geometry::Edge(index) => self.expect_kind(index, ShapeKind::Edge)?,
            Geometry::Face(index) => self.expect_kind(index, ShapeKind::Face)?,
        }
        match interference.support {
            Support::Edge(index) => self.expect_kind(index, ShapeKind::Edge)?,
            Support::Face(index) => self.expect_kind(index, ShapeKind::Face)?,
        }
        self.registry.shape(interference.owner())?;
        Ok(())
    }

    fn expect_kind(&self, index: ShapeIndex, expected: ShapeKind) -> Result<()> {
        let kind = self.registry.kind(index)?;
        if kind == expected {
            Ok(())
        } else {
            Err(OperationError::InvalidInput(format!("shape {index} is a {kind}, expected a {expected}")).into())
        }
    }
}

impl Default for BooleanDs {
    fn default() -> Self {
        Self::new(crate::config::Tolerances::default().max_same_domain_fanout)
    }
}
