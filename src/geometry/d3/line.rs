use super::{
    ensure_defined, Contains, Intersection, IntersectionWith, Intersects, Plane, PointSet,
    Transformable, Transformation,
};
use crate::error::{GeometryError, Result};
use crate::math::{undefined_point, undefined_vector, Defined, Point3, Vector3};

/// An infinite straight line through `origin` along a unit `direction`.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new line. The direction is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if `direction` has zero length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len == 0.0 {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Line through two distinct points, directed from `first` to `second`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn from_points(first: Point3, second: Point3) -> Result<Self> {
        Self::new(first, second - first)
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            origin: undefined_point(),
            direction: undefined_vector(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the direction (unit vector).
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Perpendicular distance from `point` to the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line or the point is undefined.
    pub fn distance_to(&self, point: &Point3) -> Result<f64> {
        ensure_defined(self.is_defined(), "Line")?;
        ensure_defined(point.is_defined(), "Point")?;
        Ok(self.direction.cross(&(point - self.origin)).norm())
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        (self.direction == other.direction || self.direction == -other.direction)
            && self.direction.cross(&(other.origin - self.origin)).norm_squared() == 0.0
    }
}

impl Defined for Line {
    fn is_defined(&self) -> bool {
        self.origin.is_defined() && self.direction.is_defined()
    }
}

impl Contains<Point3> for Line {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(self.is_defined(), "Line")?;
        ensure_defined(point.is_defined(), "Point")?;
        Ok(self.direction.cross(&(point - self.origin)).norm_squared() == 0.0)
    }
}

impl Contains<PointSet> for Line {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Line")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(!points.is_empty())
    }
}

impl Intersects<Point3> for Line {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Intersects<Plane> for Line {
    fn intersects(&self, plane: &Plane) -> Result<bool> {
        Ok(!self.intersection_with(plane)?.is_empty())
    }
}

impl IntersectionWith<Plane> for Line {
    fn intersection_with(&self, plane: &Plane) -> Result<Intersection> {
        ensure_defined(self.is_defined(), "Line")?;
        ensure_defined(plane.is_defined(), "Plane")?;

        let n = plane.normal();
        let v = self.direction;
        let offset = n.dot(&(plane.point() - self.origin));
        let n_dot_v = n.dot(&v);

        if n_dot_v == 0.0 {
            return Ok(if offset == 0.0 {
                Intersection::line(self.clone())
            } else {
                Intersection::empty()
            });
        }

        let t = offset / n_dot_v;
        Ok(Intersection::point(self.origin + v * t))
    }
}

impl Transformable for Line {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Line")? {
            let origin = transformation.apply_to_point(&self.origin)?;
            let direction = transformation.apply_to_vector(&self.direction)?;
            *self = Self::new(origin, direction)?;
        }
        Ok(())
    }
}
