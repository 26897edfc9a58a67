use super::{
    ensure_defined, Cone, Contains, Intersection, IntersectionParams, IntersectionWith, Intersects,
    Line, Plane, PointSet, Pyramid, Ray, Segment, Transformable, Transformation,
};
use crate::error::{GeometryError, Result, TransformationError};
use crate::math::quadratic::real_roots;
use crate::math::{undefined_point, Defined, Point3, Vector3, EPSILON};

/// A sphere given by its center and radius.
///
/// `contains` tests membership of the surface, not the ball. The boolean
/// `intersects` queries against lines, rays and segments test the solid
/// ball.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// # Errors
    ///
    /// Returns an error if `radius` is negative.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if radius < 0.0 {
            return Err(
                GeometryError::InvalidArgument(format!("sphere radius {radius} is negative")).into(),
            );
        }
        Ok(Self { center, radius })
    }

    /// Sphere of radius 1 around `center`.
    #[must_use]
    pub fn unit(center: Point3) -> Self {
        Self {
            center,
            radius: 1.0,
        }
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            center: undefined_point(),
            radius: f64::NAN,
        }
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// # Errors
    ///
    /// Returns an error if the sphere is undefined.
    pub fn is_unitary(&self) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        Ok(self.radius == 1.0)
    }

    /// Surface points along an infinite line.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    pub fn intersection_with_line(&self, line: &Line) -> Result<Intersection> {
        ensure_defined(line.is_defined(), "Line")?;
        ensure_defined(self.is_defined(), "Sphere")?;
        let hits = self.surface_hits(line.origin(), line.direction(), |_| true);
        Ok(Intersection::from_hits(hits))
    }

    /// Surface points along a ray.
    ///
    /// With `only_in_sight`, only the hit closest to the ray origin is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    pub fn intersection_with_ray(&self, ray: &Ray, only_in_sight: bool) -> Result<Intersection> {
        ensure_defined(ray.is_defined(), "Ray")?;
        ensure_defined(self.is_defined(), "Sphere")?;
        let hits = self.surface_hits(ray.origin(), ray.direction(), |t| t >= 0.0);
        Ok(Intersection::from_ray_hits(hits, only_in_sight))
    }

    /// Surface points along a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    pub fn intersection_with_segment(&self, segment: &Segment) -> Result<Intersection> {
        ensure_defined(segment.is_defined(), "Segment")?;
        ensure_defined(self.is_defined(), "Sphere")?;
        if segment.is_degenerate() {
            return self.intersection_with_point(segment.first());
        }
        let direction = segment.second() - segment.first();
        let hits = self.surface_hits(segment.first(), &direction, |t| (0.0..=1.0).contains(&t));
        Ok(Intersection::from_hits(hits))
    }

    fn intersection_with_point(&self, point: &Point3) -> Result<Intersection> {
        Ok(if self.contains(point)? {
            Intersection::point(*point)
        } else {
            Intersection::empty()
        })
    }

    /// Solves `|origin + t*direction - center|^2 = r^2` and keeps accepted
    /// roots in ascending `t`.
    fn surface_hits(
        &self,
        origin: &Point3,
        direction: &Vector3,
        accept: impl Fn(f64) -> bool,
    ) -> Vec<Point3> {
        let offset = origin - self.center;
        let a = direction.norm_squared();
        let b = 2.0 * direction.dot(&offset);
        let c = offset.norm_squared() - self.radius * self.radius;
        real_roots(a, b, c)
            .into_iter()
            .filter(|&t| accept(t))
            .map(|t| origin + direction * t)
            .collect()
    }
}

impl PartialEq for Sphere {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        self.center == other.center && self.radius == other.radius
    }
}

impl Defined for Sphere {
    fn is_defined(&self) -> bool {
        self.center.is_defined() && self.radius.is_defined()
    }
}

// ── containment ──

impl Contains<Point3> for Sphere {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "Sphere")?;
        Ok(((point - self.center).norm_squared() - self.radius * self.radius).abs() < EPSILON)
    }
}

impl Contains<PointSet> for Sphere {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(!points.is_empty())
    }
}

// ── intersection tests ──

impl Intersects<Point3> for Sphere {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Intersects<PointSet> for Sphere {
    fn intersects(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if self.contains(point)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Intersects<Line> for Sphere {
    fn intersects(&self, line: &Line) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        Ok(line.distance_to(&self.center)? <= self.radius)
    }
}

impl Intersects<Ray> for Sphere {
    fn intersects(&self, ray: &Ray) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        Ok(ray.distance_to(&self.center)? <= self.radius)
    }
}

impl Intersects<Segment> for Sphere {
    fn intersects(&self, segment: &Segment) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        Ok(segment.distance_to(&self.center)? <= self.radius)
    }
}

impl Intersects<Plane> for Sphere {
    fn intersects(&self, plane: &Plane) -> Result<bool> {
        ensure_defined(self.is_defined(), "Sphere")?;
        Ok(plane.signed_distance_to(&self.center)?.abs() <= self.radius)
    }
}

impl Intersects<Pyramid> for Sphere {
    fn intersects(&self, pyramid: &Pyramid) -> Result<bool> {
        pyramid.intersects(self)
    }
}

impl Intersects<Cone> for Sphere {
    fn intersects(&self, cone: &Cone) -> Result<bool> {
        cone.intersects(self)
    }
}

// ── intersections ──

impl IntersectionWith<Line> for Sphere {
    fn intersection_with(&self, line: &Line) -> Result<Intersection> {
        self.intersection_with_line(line)
    }
}

impl IntersectionWith<Ray> for Sphere {
    fn intersection_with(&self, ray: &Ray) -> Result<Intersection> {
        self.intersection_with_ray(ray, false)
    }
}

impl IntersectionWith<Segment> for Sphere {
    fn intersection_with(&self, segment: &Segment) -> Result<Intersection> {
        self.intersection_with_segment(segment)
    }
}

impl IntersectionWith<Pyramid> for Sphere {
    fn intersection_with(&self, pyramid: &Pyramid) -> Result<Intersection> {
        pyramid.intersection_with_sphere(self, &IntersectionParams::default())
    }
}

impl IntersectionWith<Cone> for Sphere {
    fn intersection_with(&self, cone: &Cone) -> Result<Intersection> {
        cone.intersection_with_sphere(self, &IntersectionParams::default())
    }
}

impl Transformable for Sphere {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Sphere")? {
            if !transformation.is_rigid() {
                return Err(TransformationError::NotRigid.into());
            }
            self.center = transformation.apply_to_point(&self.center)?;
        }
        Ok(())
    }
}
