//! Small scenes of boxes and section edges for the pass tests.
#![allow(clippy::unwrap_used)]

use crate::config::Tolerances;
use crate::geometry::Line;
use crate::math::Point3;
use crate::operations::creation::MakeBox;
use crate::topology::{EdgeCurve, EdgeData, ShapeKind, ShapeRef, SolidId, TopologyStore, VertexData};

use super::ds::BooleanDs;
use super::engine::{run_passes, PassReport};
use super::interference::{Geometry, Interference, Orientation, ShapeIndex, Support, Transition};
use super::pass::PassContext;
use super::registry::Rank;
use super::same_domain::SameDomainDetector;
use super::transition::TransitionResolver;

pub(super) struct Scene {
    pub store: TopologyStore,
    pub ds: BooleanDs,
    pub detector: SameDomainDetector,
    pub resolver: TransitionResolver,
    pub tolerances: Tolerances,
}

impl Scene {
    pub fn new() -> Self {
        let tolerances = Tolerances::default();
        Self {
            store: TopologyStore::new(),
            ds: BooleanDs::new(tolerances.max_same_domain_fanout),
            detector: SameDomainDetector::new(&tolerances),
            resolver: TransitionResolver::new(tolerances),
            tolerances,
        }
    }

    /// Adds and registers a box; faces keep the `MakeBox` order.
    pub fn add_box(&mut self, min: [f64; 3], max: [f64; 3], rank: Rank) -> SolidId {
        let solid = MakeBox::new(Point3::from(min), Point3::from(max))
            .execute(&mut self.store)
            .unwrap();
        for shape in self.store.explore_solid(solid).unwrap() {
            self.ds.register(shape, rank);
        }
        solid
    }

    pub fn face(&self, solid: SolidId, slot: usize) -> ShapeIndex {
        let id = self.store.solid(solid).unwrap().faces[slot];
        self.ds.registry().index_of(ShapeRef::Face(id)).unwrap()
    }

    /// The registered operand edge joining two corners.
    pub fn edge(&self, a: [f64; 3], b: [f64; 3]) -> ShapeIndex {
        let (a, b) = (Point3::from(a), Point3::from(b));
        let close = |p: &Point3, q: &Point3| (p - q).norm() < 1e-9;
        self.ds
            .registry()
            .indices()
            .find(|&i| {
                if self.ds.registry().kind(i).unwrap() != ShapeKind::Edge
                    || self.ds.registry().is_section_edge(i)
                {
                    return false;
                }
                let data = self.store.edge(self.ds.registry().edge_id(i).unwrap()).unwrap();
                let p = self.store.vertex(data.start).unwrap().point;
                let q = self.store.vertex(data.end).unwrap().point;
                (close(&p, &a) && close(&q, &b)) || (close(&p, &b) && close(&q, &a))
            })
            .unwrap()
    }

    /// A straight section edge from `a` to `b`, parametrized by length.
    pub fn section(&mut self, a: [f64; 3], b: [f64; 3], rank: Rank) -> ShapeIndex {
        let (a, b) = (Point3::from(a), Point3::from(b));
        let start = self.store.add_vertex(VertexData::new(a));
        let end = self.store.add_vertex(VertexData::new(b));
        let id = self.store.add_edge(EdgeData {
            start,
            end,
            curve: EdgeCurve::Line(Line::through(a, b).unwrap()),
            t_start: 0.0,
            t_end: (b - a).norm(),
        });
        self.ds.register_section_edge(id, rank).unwrap()
    }

    /// A computed point at `parameter` on some section edge.
    pub fn point(&mut self, at: [f64; 3], parameter: f64) -> Geometry {
        let index = self.ds.add_point(Point3::from(at), 1e-7);
        Geometry::Point {
            index,
            parameter: Some(parameter),
        }
    }

    /// Records that `edge` lies on `face`.
    pub fn split_on(&mut self, face: ShapeIndex, edge: ShapeIndex, support: ShapeIndex) {
        let split = Interference::new(
            Geometry::Edge(edge),
            Support::Face(support),
            Transition::oriented(Orientation::Internal, face),
        );
        self.ds.store_interference(face, split).unwrap();
    }

    pub fn add(&mut self, owner: ShapeIndex, interference: Interference) {
        self.ds.store_interference(owner, interference).unwrap();
    }

    pub fn list(&self, owner: ShapeIndex) -> Vec<Interference> {
        self.ds.interferences_of(owner).unwrap().to_vec()
    }

    /// One run of the whole pass pipeline.
    pub fn run(&mut self) -> PassReport {
        run_passes(&mut self.ctx()).unwrap()
    }

    pub fn ctx(&mut self) -> PassContext<'_, TopologyStore> {
        PassContext {
            ds: &mut self.ds,
            kernel: &self.store,
            detector: &mut self.detector,
            resolver: &self.resolver,
            tolerances: &self.tolerances,
        }
    }
}

pub(super) fn oriented(orientation: Orientation, owner: ShapeIndex) -> Transition {
    Transition::oriented(orientation, owner)
}
