pub mod interval;
pub mod quadratic;

pub use interval::{Interval, IntervalKind};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Unit quaternion used for orientations. Rotations are active: `q * v`
/// rotates `v`.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Machine-level tolerance used for surface membership and axis
/// orthogonality checks.
pub const EPSILON: f64 = 1e-15;

/// Band around a zero discriminant inside which a segment is treated as
/// tangent to an ellipsoid.
pub const ELLIPSOID_TOLERANCE: f64 = 1e-25;

/// Values with no NaN or infinite component.
///
/// Undefined geometry is represented by NaN-poisoned fields, so this is
/// the single predicate every guard relies on.
pub trait Defined {
    fn is_defined(&self) -> bool;
}

impl Defined for f64 {
    fn is_defined(&self) -> bool {
        self.is_finite()
    }
}

impl Defined for Point2 {
    fn is_defined(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Defined for Point3 {
    fn is_defined(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Defined for Vector2 {
    fn is_defined(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Defined for Vector3 {
    fn is_defined(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Defined for UnitQuaternion {
    fn is_defined(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }
}

/// A point whose coordinates are all NaN.
#[must_use]
pub fn undefined_point() -> Point3 {
    Point3::new(f64::NAN, f64::NAN, f64::NAN)
}

#[must_use]
pub fn undefined_point_2d() -> Point2 {
    Point2::new(f64::NAN, f64::NAN)
}

/// A vector whose components are all NaN.
#[must_use]
pub fn undefined_vector() -> Vector3 {
    Vector3::new(f64::NAN, f64::NAN, f64::NAN)
}

/// Returns `true` if two points are within `tolerance` of each other.
#[must_use]
pub fn is_near(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// Returns `true` if two 2D points are within `tolerance` of each other.
#[must_use]
pub fn is_near_2d(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// Returns a unit vector perpendicular to `v`.
///
/// Crosses with X unless `v` is close to X, then with Y.
#[must_use]
pub fn any_perpendicular(v: &Vector3) -> Vector3 {
    let reference = if v.dot(&Vector3::x()).abs() < 0.5 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&reference).normalize()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn nan_point_is_undefined() {
        assert!(!undefined_point().is_defined());
        assert!(Point3::new(1.0, 2.0, 3.0).is_defined());
        assert!(!Point3::new(1.0, f64::INFINITY, 3.0).is_defined());
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        for v in [Vector3::x(), Vector3::z(), Vector3::new(1.0, 1.0, 0.0)] {
            let n = any_perpendicular(&v);
            assert!((n.norm() - 1.0).abs() < 1e-12);
            assert!(n.dot(&v).abs() < 1e-12);
        }
    }

    #[test]
    fn near_points() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 1e-9);
        assert!(is_near(&a, &b, 1e-8));
        assert!(!is_near(&a, &b, 1e-10));
    }
}
