/// 2D point type (surface parameters).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Normalizes `v`, returning `None` when it is shorter than [`TOLERANCE`].
#[must_use]
pub fn try_normalize(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        None
    } else {
        Some(v / len)
    }
}

/// Unsigned angle in radians between two non-zero vectors.
#[must_use]
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    let cross = a.cross(b).norm();
    let dot = a.dot(b);
    cross.atan2(dot)
}

/// Returns `true` if `a` and `b` are parallel or anti-parallel within `angular`.
#[must_use]
pub fn is_parallel(a: &Vector3, b: &Vector3, angular: f64) -> bool {
    let angle = angle_between(a, b);
    angle < angular || (std::f64::consts::PI - angle) < angular
}

/// Finds a unit direction perpendicular to the given unit vector.
#[must_use]
pub fn perpendicular_dir(axis: &Vector3) -> Vector3 {
    let candidate = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let perp = axis.cross(&candidate);
    perp / perp.norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn angle_of_orthogonal_vectors() {
        assert_relative_eq!(
            angle_between(&Vector3::x(), &Vector3::y()),
            std::f64::consts::FRAC_PI_2
        );
    }

    #[test]
    fn opposite_vectors_are_parallel() {
        assert!(is_parallel(&Vector3::z(), &-Vector3::z(), 1e-9));
        assert!(!is_parallel(&Vector3::z(), &Vector3::x(), 1e-9));
    }

    #[test]
    fn tiny_vector_does_not_normalize() {
        assert!(try_normalize(&Vector3::new(0.0, 1e-12, 0.0)).is_none());
        let n = try_normalize(&Vector3::new(0.0, 3.0, 4.0));
        assert!(n.is_some_and(|n| (n.norm() - 1.0).abs() < TOLERANCE));
    }

    #[test]
    fn perpendicular_is_orthogonal() {
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            assert!(perpendicular_dir(&axis).dot(&axis).abs() < TOLERANCE);
        }
    }
}
