mod composite;
mod cone;
mod ellipsoid;
mod intersection;
mod lateral;
mod line;
mod line_string;
mod object;
mod plane;
mod point_set;
mod polygon;
mod pyramid;
mod ray;
mod segment;
mod sphere;
mod transformation;

pub use composite::Composite;
pub use cone::Cone;
pub use ellipsoid::Ellipsoid;
pub use intersection::{Intersection, IntersectionKind};
pub use line::Line;
pub use line_string::LineString;
pub use object::{Object, ObjectKind};
pub use plane::Plane;
pub use point_set::PointSet;
pub use polygon::Polygon;
pub use pyramid::Pyramid;
pub use ray::Ray;
pub use segment::Segment;
pub use sphere::Sphere;
pub use transformation::{Transformable, Transformation, TransformationKind};

use crate::error::{GeometryError, Result};

/// Number of rays sampled on a cone or pyramid lateral surface when no
/// level is given.
pub const DEFAULT_DISCRETIZATION_LEVEL: usize = 40;

/// Parameters controlling discretized cone/pyramid vs. quadric
/// intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionParams {
    /// Keep only the hit closest to the apex along each sampled ray.
    pub only_in_sight: bool,
    /// Number of rays sampled on the lateral surface.
    pub discretization_level: usize,
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            only_in_sight: false,
            discretization_level: DEFAULT_DISCRETIZATION_LEVEL,
        }
    }
}

/// Boolean intersection test against another shape.
pub trait Intersects<Rhs: ?Sized> {
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    fn intersects(&self, other: &Rhs) -> Result<bool>;
}

/// Containment test against another shape.
pub trait Contains<Rhs: ?Sized> {
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    fn contains(&self, other: &Rhs) -> Result<bool>;
}

/// Computes the geometric intersection with another shape.
pub trait IntersectionWith<Rhs: ?Sized> {
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    fn intersection_with(&self, other: &Rhs) -> Result<Intersection>;
}

/// Fails with [`GeometryError::Undefined`] naming `what` unless `defined`.
pub(crate) fn ensure_defined(defined: bool, what: &'static str) -> Result<()> {
    if defined {
        Ok(())
    } else {
        Err(GeometryError::Undefined(what).into())
    }
}
