//! Interference records and the transitions they carry.

use std::fmt;

/// Dense, 1-based index of a registered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeIndex(pub(crate) u32);

/// Dense, 1-based index of a registered 3D point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointIndex(pub(crate) u32);

/// Dense, 1-based index of a registered intersection curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurveIndex(pub(crate) u32);

macro_rules! index_accessors {
    ($($ty:ident),*) => {$(
        impl $ty {
            /// Returns the raw 1-based value.
            #[must_use]
            pub fn get(self) -> u32 {
                self.0
            }

            /// Zero-based table slot; index 0 maps past any table end.
            pub(crate) fn slot(self) -> usize {
                (self.0 as usize).wrapping_sub(1)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    )*};
}

index_accessors!(ShapeIndex, PointIndex, CurveIndex);

/// Material state on one side of an interference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    In,
    Out,
    On,
    Unknown,
    Internal,
    External,
    Forward,
    Reversed,
}

/// Orientation summarizing a `(before, after)` state pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The curve enters the owner's material.
    Forward,
    /// The curve leaves the owner's material.
    Reversed,
    /// Contact on the material side without crossing.
    Internal,
    /// Contact from outside without crossing.
    External,
}

impl Orientation {
    /// Forward or reversed: the curve genuinely crosses.
    #[must_use]
    pub fn is_crossing(self) -> bool {
        matches!(self, Self::Forward | Self::Reversed)
    }

    /// Internal or external: tangential contact, low confidence.
    #[must_use]
    pub fn is_ambiguous(self) -> bool {
        matches!(self, Self::Internal | Self::External)
    }
}

/// The `(before, after)` classification around a point, expressed in the
/// frame of the owner shape (a face for 3D transitions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub before: State,
    pub after: State,
    pub owner: ShapeIndex,
}

impl Transition {
    /// Creates a transition from explicit states.
    #[must_use]
    pub fn new(before: State, after: State, owner: ShapeIndex) -> Self {
        Self {
            before,
            after,
            owner,
        }
    }

    /// Creates the canonical state pair for an orientation.
    #[must_use]
    pub fn oriented(orientation: Orientation, owner: ShapeIndex) -> Self {
        let (before, after) = match orientation {
            Orientation::Forward => (State::Forward, State::Reversed),
            Orientation::Reversed => (State::Reversed, State::Forward),
            Orientation::Internal => (State::Internal, State::External),
            Orientation::External => (State::External, State::Internal),
        };
        Self::new(before, after, owner)
    }

    /// A transition nothing is known about yet.
    #[must_use]
    pub fn unknown(owner: ShapeIndex) -> Self {
        Self::new(State::Unknown, State::Unknown, owner)
    }

    /// Summarizes the state pair, if it has a definite orientation.
    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        match (self.before, self.after) {
            (State::Forward, _) | (State::Out, State::In) => Some(Orientation::Forward),
            (State::Reversed, _) | (State::In, State::Out) => Some(Orientation::Reversed),
            (State::Internal, _) | (State::In, State::In) => Some(Orientation::Internal),
            (State::External, _) | (State::Out, State::Out) => Some(Orientation::External),
            _ => None,
        }
    }

    /// Returns `true` if either side is [`State::Unknown`].
    #[must_use]
    pub fn has_unknown(&self) -> bool {
        self.before == State::Unknown || self.after == State::Unknown
    }

    /// Same states, expressed in another owner's frame.
    #[must_use]
    pub fn with_owner(self, owner: ShapeIndex) -> Self {
        Self { owner, ..self }
    }
}

/// Discriminant of [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    Point,
    Vertex,
    Edge,
    Curve,
    Face,
}

/// What an interference happens on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A computed 3D point, optionally located on the owner curve.
    Point {
        index: PointIndex,
        parameter: Option<f64>,
    },
    /// A vertex of one operand; `is_bound` marks an endpoint of the owner curve.
    Vertex {
        index: ShapeIndex,
        parameter: Option<f64>,
        is_bound: bool,
    },
    /// An edge, typically a section edge lying on the owner face.
    Edge(ShapeIndex),
    /// An intersection curve.
    Curve(CurveIndex),
    Face(ShapeIndex),
}

/// Grouping key of a geometry: kind plus raw index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryKey {
    pub kind: GeometryKind,
    pub index: u32,
}

impl Geometry {
    /// Returns the geometry discriminant.
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point { .. } => GeometryKind::Point,
            Self::Vertex { .. } => GeometryKind::Vertex,
            Self::Edge(_) => GeometryKind::Edge,
            Self::Curve(_) => GeometryKind::Curve,
            Self::Face(_) => GeometryKind::Face,
        }
    }

    /// Kind and raw index, used to group interferences by geometry.
    #[must_use]
    pub fn key(&self) -> GeometryKey {
        let index = match *self {
            Self::Point { index, .. } => index.get(),
            Self::Curve(index) => index.get(),
            Self::Vertex { index, .. } | Self::Edge(index) | Self::Face(index) => index.get(),
        };
        GeometryKey {
            kind: self.kind(),
            index,
        }
    }

    /// The shape index, for geometries that are registered shapes.
    #[must_use]
    pub fn shape(&self) -> Option<ShapeIndex> {
        match *self {
            Self::Vertex { index, .. } | Self::Edge(index) | Self::Face(index) => Some(index),
            Self::Point { .. } | Self::Curve(_) => None,
        }
    }

    /// Parameter on the owner curve, for point-like geometries.
    #[must_use]
    pub fn parameter(&self) -> Option<f64> {
        match *self {
            Self::Point { parameter, .. } | Self::Vertex { parameter, .. } => parameter,
            Self::Edge(_) | Self::Curve(_) | Self::Face(_) => None,
        }
    }

    /// Returns `true` for a vertex marked as an endpoint of the owner curve.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Vertex { is_bound: true, .. })
    }
}

/// Discriminant of [`Support`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportKind {
    Edge,
    Face,
}

/// The shape of the other operand the interference is recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    Edge(ShapeIndex),
    Face(ShapeIndex),
}

impl Support {
    #[must_use]
    pub fn kind(self) -> SupportKind {
        match self {
            Self::Edge(_) => SupportKind::Edge,
            Self::Face(_) => SupportKind::Face,
        }
    }

    #[must_use]
    pub fn index(self) -> ShapeIndex {
        match self {
            Self::Edge(index) | Self::Face(index) => index,
        }
    }
}

/// One recorded contact between the owner shape and the other operand.
///
/// Interferences are immutable values; a shape's list is changed only by
/// replacing it as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interference {
    pub geometry: Geometry,
    pub support: Support,
    pub transition: Transition,
}

impl Interference {
    #[must_use]
    pub fn new(geometry: Geometry, support: Support, transition: Transition) -> Self {
        Self {
            geometry,
            support,
            transition,
        }
    }

    /// Parameter on the owner curve, if any.
    #[must_use]
    pub fn parameter(&self) -> Option<f64> {
        self.geometry.parameter()
    }

    /// Shape in whose frame the transition is expressed.
    #[must_use]
    pub fn owner(&self) -> ShapeIndex {
        self.transition.owner
    }

    /// Orientation of the transition.
    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        self.transition.orientation()
    }

    /// Returns `true` if the geometry or the support is `shape`.
    #[must_use]
    pub fn interferes_with(&self, shape: ShapeIndex) -> bool {
        self.support.index() == shape || self.geometry.shape() == Some(shape)
    }
}
