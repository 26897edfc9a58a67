use super::transformation::transform_points;
use super::{Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::geometry::d3::ensure_defined;
use crate::math::{is_near_2d, Defined, Point2};

/// An unordered collection of planar points.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point2>,
}

impl PointSet {
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point2> {
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

    /// Every point needs a distinct partner within `tolerance`; empty sets
    /// are never near.
    #[must_use]
    pub fn is_near(&self, other: &PointSet, tolerance: f64) -> bool {
        if self.is_empty() || self.len() != other.len() {
            return false;
        }
        let mut remaining: Vec<&Point2> = other.points.iter().collect();
        self.points.iter().all(|point| {
            match remaining
                .iter()
                .position(|candidate| is_near_2d(point, candidate, tolerance))
            {
                Some(index) => {
                    remaining.swap_remove(index);
                    true
                }
                None => false,
            }
        })
    }

    /// # Errors
    ///
    /// Returns an error if the set is empty or anything is undefined.
    pub fn distance_to(&self, point: &Point2) -> Result<f64> {
        let closest = self.point_closest_to(point)?;
        Ok((closest - point).norm())
    }

    /// Member nearest to `point`; the first one wins ties.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty or anything is undefined.
    pub fn point_closest_to(&self, point: &Point2) -> Result<Point2> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "PointSet")?;
        closest_point(&self.points, point)
            .ok_or_else(|| GeometryError::Degenerate("point set is empty".into()).into())
    }
}

pub(super) fn closest_point(points: &[Point2], target: &Point2) -> Option<Point2> {
    let mut best: Option<(f64, Point2)> = None;
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

impl FromIterator<Point2> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point2;
    type IntoIter = std::slice::Iter<'a, Point2>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Transformable for PointSet {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "PointSet")? {
            transform_points(&mut self.points, transformation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{undefined_point_2d, Vector2};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn equality_ignores_order() {
        let a = PointSet::new(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let b: PointSet = [p(1.0, 0.0), p(0.0, 0.0)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, PointSet::new(vec![p(0.0, 0.0)]));
    }

    #[test]
    fn near_matching_is_unordered() {
        let a = PointSet::new(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let b = PointSet::new(vec![p(1.0, 1e-9), p(1e-9, 0.0)]);
        assert!(a.is_near(&b, 1e-8));
        assert!(!a.is_near(&b, 1e-10));
        assert!(!PointSet::empty().is_near(&PointSet::empty(), 1.0));
    }

    #[test]
    fn closest_point_and_distance() {
        let set = PointSet::new(vec![p(0.0, 0.0), p(10.0, 0.0)]);
        assert_eq!(set.point_closest_to(&p(8.0, 1.0)).unwrap(), p(10.0, 0.0));
        assert!((set.distance_to(&p(3.0, 4.0)).unwrap() - 5.0).abs() < 1e-12);
        assert!(PointSet::empty().distance_to(&p(0.0, 0.0)).is_err());
        assert!(set.point_closest_to(&undefined_point_2d()).is_err());
    }

    #[test]
    fn translation_moves_every_point() {
        let mut set = PointSet::new(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let t = Transformation::translation(&Vector2::new(0.0, 2.0)).unwrap();
        set.apply_transformation(&t).unwrap();
        assert_eq!(set, PointSet::new(vec![p(0.0, 2.0), p(1.0, 2.0)]));

        let mut broken = PointSet::new(vec![undefined_point_2d()]);
        assert!(broken.apply_transformation(&t).is_err());
    }
}
