//! Tolerance configuration for a boolean session.

/// Tolerances used by the transition resolver, the same-domain detector
/// and the completion passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Points closer than this are coincident.
    pub distance: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
    /// Fraction of the local parameter interval sampled on each side of a point.
    pub parameter_step: f64,
    /// Largest same-domain group tolerated before reporting a data error.
    pub max_same_domain_fanout: usize,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            distance: 1e-7,
            angular: 1e-6,
            parameter_step: 1e-4,
            max_same_domain_fanout: 8,
        }
    }
}

impl Tolerances {
    /// Sets the distance tolerance.
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the angular tolerance.
    #[must_use]
    pub fn with_angular(mut self, angular: f64) -> Self {
        self.angular = angular;
        self
    }

    /// Sets the parameter sampling step.
    #[must_use]
    pub fn with_parameter_step(mut self, step: f64) -> Self {
        self.parameter_step = step;
        self
    }

    /// Sets the same-domain fan-out limit.
    #[must_use]
    pub fn with_max_same_domain_fanout(mut self, limit: usize) -> Self {
        self.max_same_domain_fanout = limit;
        self
    }

    /// Returns `true` if `distance` is below the coincidence tolerance.
    #[must_use]
    pub fn is_coincident(&self, distance: f64) -> bool {
        distance.abs() < self.distance
    }
}
