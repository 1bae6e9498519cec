use std::collections::BTreeSet;

use tracing::{info, instrument};

use crate::config::Tolerances;
use crate::error::{Result, TopologyError};
use crate::math::Point3;
use crate::topology::{EdgeId, GeometryKernel, ShapeRef};

use super::complete_connex::complete_connected;
use super::complete_sdm::complete_same_domain;
use super::complete_tangent::complete_tangent;
use super::connexity::Connexity;
use super::ds::BooleanDs;
use super::interference::{Interference, PointIndex, ShapeIndex, Transition};
use super::pass::PassContext;
use super::purge::purge;
use super::registry::Rank;
use super::same_domain::SameDomainDetector;
use super::transition::{TransitionQuery, TransitionResolver};

/// What one run of the pass pipeline changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Redundant interferences removed by the purge pass.
    pub purged: usize,
    /// Interferences copied onto same-domain faces.
    pub same_domain: usize,
    /// Face interferences synthesized on connected faces.
    pub connected: usize,
    /// Geometry groups whose ambiguous transition was replaced.
    pub retransitioned: usize,
}

impl PassReport {
    /// Returns `true` if no pass changed anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One boolean operation between two operands.
///
/// The caller registers both operands and the section edges, stores the
/// interferences found by the intersection step, then calls
/// [`run_purge_and_completion`](Self::run_purge_and_completion) and reads
/// the result back with [`final_interferences`](Self::final_interferences).
/// Every session owns its registry, store and same-domain cache.
#[derive(Debug)]
pub struct BooleanSession<'k, K> {
    kernel: &'k K,
    tolerances: Tolerances,
    ds: BooleanDs,
    detector: SameDomainDetector,
    resolver: TransitionResolver,
}

impl<'k, K: GeometryKernel> BooleanSession<'k, K> {
    /// Creates an empty session over `kernel`.
    #[must_use]
    pub fn new(kernel: &'k K, tolerances: Tolerances) -> Self {
        Self {
            kernel,
            tolerances,
            ds: BooleanDs::new(tolerances.max_same_domain_fanout),
            detector: SameDomainDetector::new(&tolerances),
            resolver: TransitionResolver::new(tolerances),
        }
    }

    #[must_use]
    pub fn ds(&self) -> &BooleanDs {
        &self.ds
    }

    pub fn ds_mut(&mut self) -> &mut BooleanDs {
        &mut self.ds
    }

    #[must_use]
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    // --- Registry ---

    /// Registers a shape; registering it again returns the same index.
    pub fn register(&mut self, shape: impl Into<ShapeRef>, rank: Rank) -> ShapeIndex {
        self.ds.register(shape, rank)
    }

    /// Registers every shape of an operand, typically the output of
    /// [`TopologyStore::explore_solid`](crate::topology::TopologyStore::explore_solid).
    pub fn register_all(
        &mut self,
        shapes: impl IntoIterator<Item = ShapeRef>,
        rank: Rank,
    ) -> Vec<ShapeIndex> {
        shapes
            .into_iter()
            .map(|shape| self.ds.register(shape, rank))
            .collect()
    }

    /// Registers an intersection edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is already an operand edge.
    pub fn register_section_edge(&mut self, edge: EdgeId, rank: Rank) -> Result<ShapeIndex> {
        self.ds.register_section_edge(edge, rank)
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the shape is not registered.
    pub fn index_of(&self, shape: impl Into<ShapeRef>) -> Result<ShapeIndex> {
        let shape = shape.into();
        self.ds.registry().index_of(shape).ok_or_else(|| {
            TopologyError::EntityNotFound(format!("unregistered {}", shape.kind())).into()
        })
    }

    /// # Errors
    ///
    /// Returns an error if the index is not registered.
    pub fn ancestor_rank(&self, index: ShapeIndex) -> Result<Rank> {
        self.ds.registry().ancestor_rank(index)
    }

    /// # Errors
    ///
    /// Returns an error if the index is not registered.
    pub fn same_domain(&self, index: ShapeIndex) -> Result<&BTreeSet<ShapeIndex>> {
        self.ds.registry().same_domain(index)
    }

    /// # Errors
    ///
    /// Returns an error if either index is unregistered or a group overflows.
    pub fn add_same_domain(&mut self, a: ShapeIndex, b: ShapeIndex) -> Result<()> {
        self.ds.registry_mut().add_same_domain(a, b)
    }

    pub fn section_edges(&self) -> impl Iterator<Item = ShapeIndex> + Clone + '_ {
        self.ds.registry().section_edges()
    }

    // --- Interferences ---

    pub fn add_point(&mut self, point: Point3, tolerance: f64) -> PointIndex {
        self.ds.add_point(point, tolerance)
    }

    /// # Errors
    ///
    /// Returns an error if the owner or any referenced index is not registered.
    pub fn store(&mut self, owner: ShapeIndex, interference: Interference) -> Result<()> {
        self.ds.store_interference(owner, interference)
    }

    /// # Errors
    ///
    /// Returns an error if the owner is not registered.
    pub fn interferences_of(&self, owner: ShapeIndex) -> Result<&[Interference]> {
        self.ds.interferences_of(owner)
    }

    /// # Errors
    ///
    /// Returns an error if the owner is unregistered or a new interference is invalid.
    pub fn replace(&mut self, owner: ShapeIndex, list: Vec<Interference>) -> Result<Vec<Interference>> {
        self.ds.replace(owner, list)
    }

    /// The owner's interferences once the pipeline has run.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner is not registered.
    pub fn final_interferences(&self, owner: ShapeIndex) -> Result<&[Interference]> {
        self.ds.interferences_of(owner)
    }

    // --- Classification ---

    /// See [`SameDomainDetector::is_same_domain`].
    ///
    /// # Errors
    ///
    /// Returns an error if either index is unregistered.
    pub fn is_same_domain(&mut self, a: ShapeIndex, b: ShapeIndex, at: &Point3) -> Result<bool> {
        self.detector
            .is_same_domain(self.ds.registry_mut(), self.kernel, a, b, at)
    }

    /// Classifies a point of an edge against a face, trying the faces the
    /// edge is connected to as same-domain partners.
    ///
    /// # Errors
    ///
    /// See [`TransitionResolver::resolve`].
    pub fn resolve_transition(&mut self, query: &TransitionQuery) -> Result<Transition> {
        let sharing = Connexity::build(&self.ds).faces_of(&self.ds, self.kernel, query.edge)?;
        self.resolver.resolve(
            self.ds.registry_mut(),
            self.kernel,
            &mut self.detector,
            query,
            &sharing,
        )
    }

    // --- Pipeline ---

    /// Runs the purge pass, then the three completion passes.
    ///
    /// Running it again on its own output changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; recoverable geometry errors only skip
    /// the interference concerned.
    #[instrument(skip_all, fields(section_edges = self.ds.registry().section_edges().count()))]
    pub fn run_purge_and_completion(&mut self) -> Result<PassReport> {
        let mut ctx = PassContext {
            ds: &mut self.ds,
            kernel: self.kernel,
            detector: &mut self.detector,
            resolver: &self.resolver,
            tolerances: &self.tolerances,
        };
        let report = run_passes(&mut ctx)?;
        info!(?report, "purge and completion finished");
        Ok(report)
    }
}

/// The purge pass followed by the three completion passes, in order.
pub(super) fn run_passes<K: GeometryKernel>(ctx: &mut PassContext<'_, K>) -> Result<PassReport> {
    // Step 1: drop crossings that restate a split
    let purged = purge(ctx)?;
    // Step 2: repeat ambiguous contacts on same-domain faces
    let same_domain = complete_same_domain(ctx)?;
    // Step 3: synthesize missing face interferences
    let connected = complete_connected(ctx)?;
    // Step 4: resolve remaining tangential contacts
    let retransitioned = complete_tangent(ctx)?;

    Ok(PassReport {
        purged,
        same_domain,
        connected,
        retransitioned,
    })
}
