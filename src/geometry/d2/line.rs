use super::{PointSet, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::geometry::d3::ensure_defined;
use crate::math::{undefined_point_2d, Defined, Point2, Vector2};

/// An infinite line in the plane with a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    origin: Point2,
    direction: Vector2,
}

impl Line {
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero direction.
    pub fn new(origin: Point2, direction: Vector2) -> Result<Self> {
        if direction.is_defined() && direction.norm_squared() == 0.0 {
            return Err(GeometryError::ZeroVector.into());
        }
        let direction = if direction.is_defined() {
            direction.normalize()
        } else {
            direction
        };
        Ok(Self { origin, direction })
    }

    /// Line through two points, directed from `first` to `second`.
    ///
    /// # Errors
    ///
    /// Returns an error if a point is undefined or the points coincide.
    pub fn from_points(first: &Point2, second: &Point2) -> Result<Self> {
        ensure_defined(first.is_defined(), "Point")?;
        ensure_defined(second.is_defined(), "Point")?;
        Self::new(*first, second - first)
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            origin: undefined_point_2d(),
            direction: Vector2::new(f64::NAN, f64::NAN),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &Point2 {
        &self.origin
    }

    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }

    /// Exact collinearity test.
    ///
    /// # Errors
    ///
    /// Returns an error if the line or the point is undefined.
    pub fn contains(&self, point: &Point2) -> Result<bool> {
        ensure_defined(point.is_defined(), "Point")?;
        self.ensure_defined()?;
        let offset = point - self.origin;
        Ok(self.direction.perp(&offset) == 0.0)
    }

    /// # Errors
    ///
    /// Returns an error if the line is undefined or the set is empty.
    pub fn contains_all(&self, points: &PointSet) -> Result<bool> {
        self.ensure_defined()?;
        if points.is_empty() {
            return Err(GeometryError::Undefined("PointSet").into());
        }
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// # Errors
    ///
    /// See [`Line::contains`].
    pub fn intersects(&self, point: &Point2) -> Result<bool> {
        self.contains(point)
    }

    /// Perpendicular distance from `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line or the point is undefined.
    pub fn distance_to(&self, point: &Point2) -> Result<f64> {
        ensure_defined(point.is_defined(), "Point")?;
        self.ensure_defined()?;
        let offset = point - self.origin;
        Ok((offset - offset.dot(&self.direction) * self.direction).norm())
    }

    fn ensure_defined(&self) -> Result<()> {
        ensure_defined(self.is_defined(), "Line")
    }
}

/// Same carrier: parallel directions and a shared point.
impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        (self.direction == other.direction || self.direction == -other.direction)
            && self.contains(&other.origin).unwrap_or(false)
    }
}

impl Defined for Line {
    fn is_defined(&self) -> bool {
        self.origin.is_defined() && self.direction.is_defined()
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
