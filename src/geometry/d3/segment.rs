use super::{
    ensure_defined, Contains, Ellipsoid, Intersection, IntersectionWith, Intersects, Line, Plane,
    Sphere, Transformable, Transformation,
};
use crate::error::{GeometryError, Result};
use crate::math::{is_near, undefined_point, Defined, Point3, Vector3};

/// A bounded segment between two points.
///
/// Equality ignores endpoint order.
#[derive(Debug, Clone)]
pub struct Segment {
    first: Point3,
    second: Point3,
}

impl Segment {
    #[must_use]
    pub fn new(first: Point3, second: Point3) -> Self {
        Self { first, second }
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            first: undefined_point(),
            second: undefined_point(),
        }
    }

    #[must_use]
    pub fn first(&self) -> &Point3 {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &Point3 {
        &self.second
    }

    /// Returns `true` if both endpoints are identical.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }

    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.first, &self.second)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.second - self.first).norm()
    }

    /// Unit vector from the first to the second endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is undefined or degenerate.
    pub fn direction(&self) -> Result<Vector3> {
        ensure_defined(self.is_defined(), "Segment")?;
        if self.is_degenerate() {
            return Err(GeometryError::Degenerate("segment has no direction".into()).into());
        }
        Ok((self.second - self.first).normalize())
    }

    /// Supporting line.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is undefined or degenerate.
    pub fn to_line(&self) -> Result<Line> {
        Line::new(self.first, self.direction()?)
    }

    /// # Errors
    ///
    /// Returns an error if the segment or the point is undefined.
    pub fn distance_to(&self, point: &Point3) -> Result<f64> {
        ensure_defined(self.is_defined(), "Segment")?;
        ensure_defined(point.is_defined(), "Point")?;
        Ok((point - self.closest_point(point)).norm())
    }

    /// Endpoints match (in either order) within `tolerance`.
    #[must_use]
    pub fn is_near(&self, other: &Segment, tolerance: f64) -> bool {
        (is_near(&self.first, &other.first, tolerance) && is_near(&self.second, &other.second, tolerance))
            || (is_near(&self.first, &other.second, tolerance)
                && is_near(&self.second, &other.first, tolerance))
    }

    fn closest_point(&self, point: &Point3) -> Point3 {
        let v = self.second - self.first;
        let len_sq = v.norm_squared();
        if len_sq == 0.0 {
            return self.first;
        }
        let t = ((point - self.first).dot(&v) / len_sq).clamp(0.0, 1.0);
        self.first + v * t
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl Defined for Segment {
    fn is_defined(&self) -> bool {
        self.first.is_defined() && self.second.is_defined()
    }
}

impl Contains<Point3> for Segment {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(self.is_defined(), "Segment")?;
        ensure_defined(point.is_defined(), "Point")?;
        if self.is_degenerate() {
            return Ok(*point == self.first);
        }
        let v = self.second - self.first;
        let offset = point - self.first;
        let along = v.dot(&offset);
        Ok(v.cross(&offset).norm_squared() == 0.0 && along >= 0.0 && along <= v.norm_squared())
    }
}

impl Intersects<Point3> for Segment {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Intersects<Plane> for Segment {
    fn intersects(&self, plane: &Plane) -> Result<bool> {
        Ok(!self.intersection_with(plane)?.is_empty())
    }
}

impl Intersects<Sphere> for Segment {
    fn intersects(&self, sphere: &Sphere) -> Result<bool> {
        sphere.intersects(self)
    }
}

impl Intersects<Ellipsoid> for Segment {
    fn intersects(&self, ellipsoid: &Ellipsoid) -> Result<bool> {
        ellipsoid.intersects(self)
    }
}

impl IntersectionWith<Plane> for Segment {
    fn intersection_with(&self, plane: &Plane) -> Result<Intersection> {
        ensure_defined(self.is_defined(), "Segment")?;
        ensure_defined(plane.is_defined(), "Plane")?;

        let n = plane.normal();
        let v = self.second - self.first;
        let offset = n.dot(&(plane.point() - self.first));
        let n_dot_v = n.dot(&v);

        if n_dot_v == 0.0 {
            return Ok(if offset == 0.0 {
                Intersection::segment(self.clone())
            } else {
                Intersection::empty()
            });
        }

        let t = offset / n_dot_v;
        if !(0.0..=1.0).contains(&t) {
            return Ok(Intersection::empty());
        }
        Ok(Intersection::point(self.first + v * t))
    }
}

impl IntersectionWith<Sphere> for Segment {
    fn intersection_with(&self, sphere: &Sphere) -> Result<Intersection> {
        sphere.intersection_with(self)
    }
}

impl IntersectionWith<Ellipsoid> for Segment {
    fn intersection_with(&self, ellipsoid: &Ellipsoid) -> Result<Intersection> {
        ellipsoid.intersection_with(self)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[test]
    fn equality_is_unordered() {
        let pairs = [
            (p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0)),
            (p(-4.0, 0.5, 1e6), p(3.0, 3.0, 3.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(Segment::new(a, b), Segment::new(b, a));
        }
        assert_ne!(Segment::undefined(), Segment::undefined());
    }

    #[test]
    fn degenerate_segment_has_no_direction() {
        let a = p(1.0, 1.0, 1.0);
        let segment = Segment::new(a, a);
        assert!(segment.is_degenerate());
        assert!(segment.direction().is_err());
        assert!(segment.to_line().is_err());
        assert!(segment.contains(&a).unwrap());
    }

    #[test]
    fn measurements() {
        let segment = Segment::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 4.0));
        assert_eq!(segment.center(), p(0.0, 0.0, 2.0));
        assert!((segment.length() - 4.0).abs() < 1e-12);
        assert_eq!(segment.direction().unwrap(), v(0.0, 0.0, 1.0));
        assert!((segment.distance_to(&p(3.0, 0.0, 2.0)).unwrap() - 3.0).abs() < 1e-12);
        assert!((segment.distance_to(&p(0.0, 0.0, 7.0)).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn contains_interior_points_only() {
        let segment = Segment::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0));
        assert!(segment.contains(&p(1.0, 0.0, 0.0)).unwrap());
        assert!(segment.contains(&p(2.0, 0.0, 0.0)).unwrap());
        assert!(!segment.contains(&p(3.0, 0.0, 0.0)).unwrap());
        assert!(!segment.contains(&p(1.0, 0.1, 0.0)).unwrap());
    }

    #[test]
    fn near_segments() {
        let a = Segment::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let b = Segment::new(p(1.0, 0.0, 1e-9), p(0.0, 0.0, 0.0));
        assert!(a.is_near(&b, 1e-8));
        assert!(!a.is_near(&b, 1e-10));
    }

    // ── plane ──

    #[test]
    fn crossing_segment_hits_plane_at_parameter() {
        let segment = Segment::new(p(0.0, 0.0, -1.0), p(0.0, 0.0, 1.0));
        let plane = Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(
            segment.intersection_with(&plane).unwrap(),
            Intersection::point(p(0.0, 0.0, 0.0))
        );

        let tilted = Segment::new(p(0.0, 0.0, -1.0), p(4.0, 2.0, 3.0));
        let hit = tilted.intersection_with(&plane).unwrap();
        // t = 0.25
        assert_eq!(hit, Intersection::point(p(1.0, 0.5, 0.0)));
    }

    #[test]
    fn short_segment_misses_plane() {
        let segment = Segment::new(p(0.0, 0.0, 1.0), p(0.0, 0.0, 2.0));
        let plane = Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(segment.intersection_with(&plane).unwrap().is_empty());
        assert!(!segment.intersects(&plane).unwrap());
    }

    #[test]
    fn segment_in_plane_returns_itself() {
        let segment = Segment::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0));
        let plane = Plane::new(p(5.0, 5.0, 0.0), v(0.0, 0.0, -1.0)).unwrap();
        let hit = segment.intersection_with(&plane).unwrap();
        assert_eq!(hit, Intersection::segment(segment));
    }

    #[test]
    fn parallel_segment_off_plane_is_empty() {
        let segment = Segment::new(p(0.0, 0.0, 1.0), p(1.0, 1.0, 1.0));
        let plane = Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(segment.intersection_with(&plane).unwrap().is_empty());
    }

    #[test]
    fn undefined_segment_is_rejected() {
        let plane = Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        assert!(Segment::undefined().intersection_with(&plane).is_err());
        assert!(Segment::undefined().contains(&p(0.0, 0.0, 0.0)).is_err());
    }
}
