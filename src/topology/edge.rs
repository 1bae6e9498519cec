use crate::error::Result;
use crate::geometry::curve::{Circle, Curve, CurveProjection, Line};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve carrying an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    Line(Line),
    Circle(Circle),
}

impl EdgeCurve {
    fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(line) => line,
            Self::Circle(circle) => circle,
        }
    }

    /// Evaluates the underlying curve.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub fn evaluate(&self, t: f64) -> Result<Point3> {
        self.as_curve().evaluate(t)
    }

    /// Unit tangent of the underlying curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        self.as_curve().tangent(t)
    }

    /// Projects a point onto the underlying curve within `[t_min, t_max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if no foot point exists.
    pub fn project(&self, point: &Point3, t_min: f64, t_max: f64) -> Result<CurveProjection> {
        self.as_curve().project(point, t_min, t_max)
    }
}

/// A bounded piece of a curve between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
}

impl EdgeData {
    /// An edge whose parameter range collapses to a point.
    #[must_use]
    pub fn is_degenerated(&self) -> bool {
        (self.t_end - self.t_start).abs() < TOLERANCE
    }
}
