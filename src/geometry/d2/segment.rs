use super::{Line, PointSet, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::geometry::d3::ensure_defined;
use crate::math::{is_near_2d, undefined_point_2d, Defined, Point2, Vector2};

/// A planar segment, used as the edge type of [`Polygon`](super::Polygon).
///
/// Equality ignores the order of the endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    first: Point2,
    second: Point2,
}

impl Segment {
    #[must_use]
    pub fn new(first: Point2, second: Point2) -> Self {
        Self { first, second }
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self::new(undefined_point_2d(), undefined_point_2d())
    }

    #[must_use]
    pub fn first(&self) -> &Point2 {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &Point2 {
        &self.second
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.second - self.first).norm()
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.first, &self.second)
    }

    /// Unit vector from the first to the second endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is undefined or degenerate.
    pub fn direction(&self) -> Result<Vector2> {
        self.ensure_defined()?;
        (self.second - self.first)
            .try_normalize(0.0)
            .ok_or_else(|| GeometryError::Degenerate("segment has no direction".into()).into())
    }

    /// # Errors
    ///
    /// Returns an error if the segment is undefined or degenerate.
    pub fn to_line(&self) -> Result<Line> {
        Line::new(self.first, self.direction()?)
    }

    /// Distance to the closest point of the segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or the point is undefined.
    pub fn distance_to(&self, point: &Point2) -> Result<f64> {
        ensure_defined(point.is_defined(), "Point")?;
        self.ensure_defined()?;
        let span = self.second - self.first;
        let length_squared = span.norm_squared();
        if length_squared == 0.0 {
            return Ok((point - self.first).norm());
        }
        let t = ((point - self.first).dot(&span) / length_squared).clamp(0.0, 1.0);
        Ok((point - (self.first + t * span)).norm())
    }

    /// Exact test: the point is collinear and lies between the endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or the point is undefined.
    pub fn contains(&self, point: &Point2) -> Result<bool> {
        ensure_defined(point.is_defined(), "Point")?;
        self.ensure_defined()?;
        let span = self.second - self.first;
        let offset = point - self.first;
        if span.perp(&offset) != 0.0 {
            return Ok(false);
        }
        Ok((0.0..=span.norm_squared()).contains(&span.dot(&offset)))
    }

    /// # Errors
    ///
    /// Returns an error if the segment is undefined or the set is empty.
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

    /// Endpoints match within `tolerance` in either order.
    #[must_use]
    pub fn is_near(&self, other: &Segment, tolerance: f64) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        let near = |a, b| is_near_2d(a, b, tolerance);
        (near(&self.first, &other.first) && near(&self.second, &other.second))
            || (near(&self.first, &other.second) && near(&self.second, &other.first))
    }

    fn ensure_defined(&self) -> Result<()> {
        ensure_defined(self.is_defined(), "Segment")
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.is_defined()
            && other.is_defined()
            && ((self.first == other.first && self.second == other.second)
                || (self.first == other.second && self.second == other.first))
    }
}

impl Defined for Segment {
    fn is_defined(&self) -> bool {
        self.first.is_defined() && self.second.is_defined()
    }
}

impl Transformable for Segment {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Segment")? {
            self.first = transformation.apply_to_point(&self.first)?;
            self.second = transformation.apply_to_point(&self.second)?;
        }
        Ok(())
    }
}
