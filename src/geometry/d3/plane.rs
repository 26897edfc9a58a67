use super::{
    ensure_defined, Contains, Ellipsoid, Intersection, IntersectionWith, Intersects, Line,
    PointSet, Ray, Segment, Sphere, Transformable, Transformation,
};
use crate::error::{GeometryError, Result};
use crate::math::{undefined_point, undefined_vector, Defined, Point3, Vector3};

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Point3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane. The normal is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if `normal` has zero length.
    pub fn new(point: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len == 0.0 {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            point,
            normal: normal / len,
        })
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            point: undefined_point(),
            normal: undefined_vector(),
        }
    }

    #[must_use]
    pub fn point(&self) -> &Point3 {
        &self.point
    }

    /// Returns the normal (unit vector).
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed distance from `point` along the normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the plane or the point is undefined.
    pub fn signed_distance_to(&self, point: &Point3) -> Result<f64> {
        ensure_defined(self.is_defined(), "Plane")?;
        ensure_defined(point.is_defined(), "Point")?;
        Ok((point - self.point).dot(&self.normal))
    }
}

impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        (self.normal == other.normal || self.normal == -other.normal)
            && (self.point == other.point || (other.point - self.point).dot(&self.normal) == 0.0)
    }
}

impl Defined for Plane {
    fn is_defined(&self) -> bool {
        self.point.is_defined() && self.normal.is_defined()
    }
}

// ── containment ──

impl Contains<Point3> for Plane {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(self.is_defined(), "Plane")?;
        ensure_defined(point.is_defined(), "Point")?;
        Ok((point - self.point).dot(&self.normal) == 0.0)
    }
}

impl Contains<PointSet> for Plane {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Plane")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(!points.is_empty())
    }
}

impl Contains<Line> for Plane {
    fn contains(&self, line: &Line) -> Result<bool> {
        ensure_defined(line.is_defined(), "Line")?;
        Ok(self.contains(line.origin())? && self.normal.dot(line.direction()) == 0.0)
    }
}

impl Contains<Ray> for Plane {
    fn contains(&self, ray: &Ray) -> Result<bool> {
        ensure_defined(ray.is_defined(), "Ray")?;
        Ok(self.contains(ray.origin())? && self.normal.dot(ray.direction()) == 0.0)
    }
}

impl Contains<Segment> for Plane {
    fn contains(&self, segment: &Segment) -> Result<bool> {
        ensure_defined(segment.is_defined(), "Segment")?;
        Ok(self.contains(segment.first())? && self.contains(segment.second())?)
    }
}

// ── intersection tests ──

impl Intersects<Point3> for Plane {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Intersects<PointSet> for Plane {
    fn intersects(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Plane")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if self.contains(point)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Intersects<Line> for Plane {
    fn intersects(&self, line: &Line) -> Result<bool> {
        line.intersects(self)
    }
}

impl Intersects<Ray> for Plane {
    fn intersects(&self, ray: &Ray) -> Result<bool> {
        ray.intersects(self)
    }
}

impl Intersects<Segment> for Plane {
    fn intersects(&self, segment: &Segment) -> Result<bool> {
        segment.intersects(self)
    }
}

impl Intersects<Sphere> for Plane {
    fn intersects(&self, sphere: &Sphere) -> Result<bool> {
        sphere.intersects(self)
    }
}

impl Intersects<Ellipsoid> for Plane {
    fn intersects(&self, ellipsoid: &Ellipsoid) -> Result<bool> {
        ellipsoid.intersects(self)
    }
}

// ── intersections ──

impl IntersectionWith<Point3> for Plane {
    fn intersection_with(&self, point: &Point3) -> Result<Intersection> {
        Ok(if self.contains(point)? {
            Intersection::point(*point)
        } else {
            Intersection::empty()
        })
    }
}

impl IntersectionWith<PointSet> for Plane {
    fn intersection_with(&self, points: &PointSet) -> Result<Intersection> {
        ensure_defined(self.is_defined(), "Plane")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        let mut inside = Vec::new();
        for point in points {
            if self.contains(point)? {
                inside.push(*point);
            }
        }
        Ok(match inside.len() {
            0 => Intersection::empty(),
            1 => Intersection::point(inside[0]),
            _ => Intersection::point_set(PointSet::new(inside)),
        })
    }
}

impl IntersectionWith<Line> for Plane {
    fn intersection_with(&self, line: &Line) -> Result<Intersection> {
        line.intersection_with(self)
    }
}

impl IntersectionWith<Ray> for Plane {
    fn intersection_with(&self, ray: &Ray) -> Result<Intersection> {
        ray.intersection_with(self)
    }
}

impl IntersectionWith<Segment> for Plane {
    fn intersection_with(&self, segment: &Segment) -> Result<Intersection> {
        segment.intersection_with(self)
    }
}

impl Transformable for Plane {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Plane")? {
            // Normals transform with the inverse transpose.
            let linear = transformation.linear_part();
            let inverse = linear
                .try_inverse()
                .ok_or(crate::error::TransformationError::Singular)?;
            let normal = inverse.transpose() * self.normal;
            let point = transformation.apply_to_point(&self.point)?;
            *self = Self::new(point, normal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::UnitQuaternion;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn xy() -> Plane {
        Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap()
    }

    #[test]
    fn equality_is_independent_of_anchor_and_normal_sign() {
        assert_eq!(xy(), Plane::new(p(1.0, 1.0, 0.0), v(0.0, 0.0, 1.0)).unwrap());
        assert_eq!(xy(), Plane::new(p(-3.0, 2.0, 0.0), v(0.0, 0.0, -5.0)).unwrap());
        assert_ne!(xy(), Plane::new(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap());
        assert!(Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn contains_points_on_plane() {
        let plane = Plane::new(p(1.0, 1.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        for point in [p(0.0, 0.0, 0.0), p(1e6, -3.0, 0.0), p(1.0, 1.0, 0.0)] {
            assert!(plane.contains(&point).unwrap());
        }
        assert!(!plane.contains(&p(0.0, 0.0, 1e-12)).unwrap());
    }

    #[test]
    fn contains_lines_rays_segments() {
        let plane = xy();
        let line = Line::new(p(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0)).unwrap();
        let ray = Ray::new(p(0.0, 1.0, 0.0), v(0.0, 0.0, 1.0)).unwrap();
        let segment = Segment::new(p(0.0, 0.0, 0.0), p(3.0, 4.0, 0.0));
        assert!(plane.contains(&line).unwrap());
        assert!(!plane.contains(&ray).unwrap());
        assert!(plane.contains(&segment).unwrap());
    }

    #[test]
    fn point_set_intersection_filters_members() {
        let plane = xy();
        let set = PointSet::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 1.0), p(2.0, 0.0, 0.0)]);
        assert!(plane.intersects(&set).unwrap());
        assert!(!plane.contains(&set).unwrap());
        let hit = plane.intersection_with(&set).unwrap();
        assert_eq!(
            hit,
            Intersection::point_set(PointSet::new(vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]))
        );
        let single = PointSet::new(vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0)]);
        assert_eq!(
            plane.intersection_with(&single).unwrap(),
            Intersection::point(p(0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn rotation_keeps_plane_through_pivot() {
        let mut plane = xy();
        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2);
        plane
            .apply_transformation(&Transformation::rotation(&q).unwrap())
            .unwrap();
        assert!((plane.normal() - v(0.0, -1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn undefined_plane_fails_every_query() {
        let undefined = Plane::undefined();
        assert!(undefined.contains(&p(0.0, 0.0, 0.0)).is_err());
        assert!(undefined.intersects(&PointSet::empty()).is_err());
        assert!(xy().contains(&crate::math::undefined_point()).is_err());
    }
}
