use super::point_set::closest_point;
use super::{ensure_defined, Segment, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::math::{is_near, Defined, Point3};

/// An ordered polyline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    points: Vec<Point3>,
}

impl LineString {
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Two-point line string following a segment.
    #[must_use]
    pub fn from_segment(segment: &Segment) -> Self {
        Self::new(vec![*segment.first(), *segment.second()])
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// # Errors
    ///
    /// Returns an error if `index` is out of bounds.
    pub fn point_at(&self, index: usize) -> Result<&Point3> {
        self.points.get(index).ok_or_else(|| {
            GeometryError::IndexOutOfBounds {
                what: "point",
                index,
                len: self.points.len(),
            }
            .into()
        })
    }

    /// Point-by-point comparison, order preserved.
    #[must_use]
    pub fn is_near(&self, other: &LineString, tolerance: f64) -> bool {
        !self.is_empty()
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| is_near(a, b, tolerance))
    }

    /// Vertex nearest to `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line string is empty or anything is undefined.
    pub fn point_closest_to(&self, point: &Point3) -> Result<Point3> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "LineString")?;
        closest_point(&self.points, point)
            .ok_or_else(|| GeometryError::Degenerate("line string is empty".into()).into())
    }
}

impl Defined for LineString {
    fn is_defined(&self) -> bool {
        self.points.iter().all(Defined::is_defined)
    }
}

impl<'a> IntoIterator for &'a LineString {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Transformable for LineString {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "LineString")? {
            for point in &mut self.points {
                *point = transformation.apply_to_point(point)?;
            }
        }
        Ok(())
    }
}
