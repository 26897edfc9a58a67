use super::{ensure_defined, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::math::{is_near, Defined, Point3};

/// An unordered collection of points.
///
/// Storage keeps insertion order and duplicates; equality ignores both.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point3>,
}

impl PointSet {
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if every point has a distinct partner within
    /// `tolerance` in the other set.
    ///
    /// Empty sets are never near anything.
    #[must_use]
    pub fn is_near(&self, other: &PointSet, tolerance: f64) -> bool {
        if self.is_empty() || other.is_empty() || self.len() != other.len() {
            return false;
        }
        let mut remaining: Vec<&Point3> = other.points.iter().collect();
        for point in &self.points {
            match remaining
                .iter()
                .position(|candidate| is_near(point, candidate, tolerance))
            {
                Some(index) => {
                    remaining.swap_remove(index);
                }
                None => return false,
            }
        }
        true
    }

    /// Distance from `point` to the nearest member.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty or anything is undefined.
    pub fn distance_to(&self, point: &Point3) -> Result<f64> {
        let closest = self.point_closest_to(point)?;
        Ok((closest - point).norm())
    }

    /// Member nearest to `point`; the first one wins ties.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty or anything is undefined.
    pub fn point_closest_to(&self, point: &Point3) -> Result<Point3> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "PointSet")?;
        closest_point(&self.points, point)
            .ok_or_else(|| GeometryError::Degenerate("point set is empty".into()).into())
    }
}

/// Nearest point by squared distance; the first one wins ties.
pub(crate) fn closest_point(points: &[Point3], target: &Point3) -> Option<Point3> {
    let mut best: Option<(f64, Point3)> = None;
    for point in points {
        let distance = (point - target).norm_squared();
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, *point));
        }
    }
    best.map(|(_, p)| p)
}

impl PartialEq for PointSet {
    fn eq(&self, other: &Self) -> bool {
        self.points.iter().all(|p| other.points.contains(p))
            && other.points.iter().all(|p| self.points.contains(p))
    }
}

impl Defined for PointSet {
    fn is_defined(&self) -> bool {
        self.points.iter().all(Defined::is_defined)
    }
}

impl FromIterator<Point3> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Transformable for PointSet {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "PointSet")? {
            for point in &mut self.points {
                *point = transformation.apply_to_point(point)?;
            }
        }
        Ok(())
    }
}
