use super::{
    ensure_defined, Contains, Ellipsoid, Intersection, IntersectionWith, Intersects, Plane,
    PointSet, Sphere, Transformable, Transformation,
};
use crate::error::{GeometryError, Result};
use crate::math::{undefined_point, undefined_vector, Defined, Point3, Vector3};

/// A half-line `origin + t * direction`, `t >= 0`.
///
/// The direction is kept as given; only its sense matters.
#[derive(Debug, Clone)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Creates a new ray.
    ///
    /// # Errors
    ///
    /// Returns an error if `direction` has zero length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        if direction.norm_squared() == 0.0 {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { origin, direction })
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

    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Point at parameter `t` (not clamped).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Distance from `point` to the closest point of the ray.
    ///
    /// # Errors
    ///
    /// Returns an error if the ray or the point is undefined.
    pub fn distance_to(&self, point: &Point3) -> Result<f64> {
        ensure_defined(self.is_defined(), "Ray")?;
        ensure_defined(point.is_defined(), "Point")?;
        let t = ((point - self.origin).dot(&self.direction) / self.direction.norm_squared()).max(0.0);
        Ok((point - self.point_at(t)).norm())
    }
}

impl PartialEq for Ray {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        self.origin == other.origin
            && self.direction.cross(&other.direction).norm_squared() == 0.0
            && self.direction.dot(&other.direction) > 0.0
    }
}

impl Defined for Ray {
    fn is_defined(&self) -> bool {
        self.origin.is_defined() && self.direction.is_defined()
    }
}

impl Contains<Point3> for Ray {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ray")?;
        ensure_defined(point.is_defined(), "Point")?;
        let offset = point - self.origin;
        Ok(self.direction.cross(&offset).norm_squared() == 0.0 && self.direction.dot(&offset) >= 0.0)
    }
}

impl Contains<PointSet> for Ray {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ray")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(!points.is_empty())
    }
}

impl Intersects<Point3> for Ray {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Intersects<Plane> for Ray {
    fn intersects(&self, plane: &Plane) -> Result<bool> {
        Ok(!self.intersection_with(plane)?.is_empty())
    }
}

impl Intersects<Sphere> for Ray {
    fn intersects(&self, sphere: &Sphere) -> Result<bool> {
        sphere.intersects(self)
    }
}

impl Intersects<Ellipsoid> for Ray {
    fn intersects(&self, ellipsoid: &Ellipsoid) -> Result<bool> {
        ellipsoid.intersects(self)
    }
}

impl IntersectionWith<Plane> for Ray {
    fn intersection_with(&self, plane: &Plane) -> Result<Intersection> {
        ensure_defined(self.is_defined(), "Ray")?;
        ensure_defined(plane.is_defined(), "Plane")?;

        let n = plane.normal();
        let offset = n.dot(&(plane.point() - self.origin));
        let n_dot_v = n.dot(&self.direction);

        if n_dot_v == 0.0 {
            return Ok(if offset == 0.0 {
                Intersection::ray(self.clone())
            } else {
                Intersection::empty()
            });
        }

        let t = offset / n_dot_v;
        if t < 0.0 {
            return Ok(Intersection::empty());
        }
        Ok(Intersection::point(self.point_at(t)))
    }
}

impl IntersectionWith<Sphere> for Ray {
    fn intersection_with(&self, sphere: &Sphere) -> Result<Intersection> {
        sphere.intersection_with_ray(self, false)
    }
}

impl IntersectionWith<Ellipsoid> for Ray {
    fn intersection_with(&self, ellipsoid: &Ellipsoid) -> Result<Intersection> {
        ellipsoid.intersection_with_ray(self, false)
    }
}

impl Transformable for Ray {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Ray")? {
            let origin = transformation.apply_to_point(&self.origin)?;
            let direction = transformation.apply_to_vector(&self.direction)?;
            *self = Self::new(origin, direction)?;
        }
        Ok(())
    }
}
