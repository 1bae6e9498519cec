//! Plumbing shared by the purge and completion passes.

use tracing::warn;

use crate::config::Tolerances;
use crate::error::Result;
use crate::math::Point3;
use crate::topology::GeometryKernel;

use super::connexity::Connexity;
use super::ds::BooleanDs;
use super::interference::{Geometry, ShapeIndex, Transition};
use super::same_domain::SameDomainDetector;
use super::transition::{TransitionQuery, TransitionResolver};

/// Everything a pass reads or writes.
pub(super) struct PassContext<'a, K> {
    pub ds: &'a mut BooleanDs,
    pub kernel: &'a K,
    pub detector: &'a mut SameDomainDetector,
    pub resolver: &'a TransitionResolver,
    pub tolerances: &'a Tolerances,
}

impl<K: GeometryKernel> PassContext<'_, K> {
    /// Section edges, collected up front so lists can be replaced while walking them.
    pub fn section_edges(&self) -> Vec<ShapeIndex> {
        self.ds.registry().section_edges().collect()
    }

    pub fn connexity(&self) -> Connexity {
        Connexity::build(self.ds)
    }

    /// Location of a point-like geometry.
    pub fn locate(&self, geometry: &Geometry) -> Result<Option<Point3>> {
        match *geometry {
            Geometry::Point { index, .. } => Ok(Some(self.ds.point(index)?.point)),
            Geometry::Vertex { index, .. } => {
                let vertex = self.ds.registry().vertex_id(index)?;
                Ok(Some(self.kernel.vertex_point(vertex)?))
            }
            Geometry::Edge(_) | Geometry::Curve(_) | Geometry::Face(_) => Ok(None),
        }
    }

    /// Tolerance attached to a point-like geometry, at least the distance tolerance.
    pub fn tolerance_of(&self, geometry: &Geometry) -> f64 {
        match *geometry {
            Geometry::Point { index, .. } => self
                .ds
                .point(index)
                .map_or(self.tolerances.distance, |p| p.tolerance.max(self.tolerances.distance)),
            _ => self.tolerances.distance,
        }
    }

    pub fn resolve(&mut self, query: &TransitionQuery, sharing: &[ShapeIndex]) -> Result<Transition> {
        self.resolver
            .resolve(self.ds.registry_mut(), self.kernel, self.detector, query, sharing)
    }
}

/// Turns a recoverable error into `None` after logging it; fatal errors pass through.
pub(super) fn recover<T>(result: Result<T>, edge: ShapeIndex) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if !err.is_fatal() => {
            warn!(%edge, %err, "interference skipped");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
