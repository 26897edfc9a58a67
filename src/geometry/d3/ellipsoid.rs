use nalgebra::{Rotation3, SymmetricEigen};

use super::{
    ensure_defined, Cone, Contains, Intersection, IntersectionParams, IntersectionWith, Intersects,
    Line, Plane, PointSet, Pyramid, Ray, Segment, Transformable, Transformation,
};
use crate::error::{GeometryError, Result, TransformationError};
use crate::math::quadratic::reduced_roots;
use crate::math::{
    undefined_point, Defined, Interval, Matrix3, Point3, UnitQuaternion, Vector3,
    ELLIPSOID_TOLERANCE, EPSILON,
};

/// An oriented ellipsoid.
///
/// The principal axes are the images of X, Y and Z under `orientation`,
/// with semi-axis lengths `a`, `b` and `c`. The surface is the set of
/// points `p` with `(p - center)^T M (p - center) = 1`, where `M` is
/// [`Ellipsoid::quadratic_form`].
#[derive(Debug, Clone)]
pub struct Ellipsoid {
    center: Point3,
    a: f64,
    b: f64,
    c: f64,
    orientation: UnitQuaternion,
}

/// Coefficients of `a2*t^2 + 2*a1*t + a0 = 0` for `origin + t*direction`.
struct Quadric {
    a2: f64,
    a1: f64,
    a0: f64,
}

impl Quadric {
    fn discriminant(&self) -> f64 {
        self.a1 * self.a1 - self.a0 * self.a2
    }
}

impl Ellipsoid {
    /// # Errors
    ///
    /// Returns an error if any semi-axis is negative.
    pub fn new(center: Point3, a: f64, b: f64, c: f64, orientation: UnitQuaternion) -> Result<Self> {
        if a < 0.0 || b < 0.0 || c < 0.0 {
            return Err(GeometryError::InvalidArgument(format!(
                "ellipsoid semi-axes ({a}, {b}, {c}) must be non-negative"
            ))
            .into());
        }
        Ok(Self {
            center,
            a,
            b,
            c,
            orientation,
        })
    }

    /// Axis-aligned ellipsoid.
    ///
    /// # Errors
    ///
    /// See [`Ellipsoid::new`].
    pub fn aligned(center: Point3, a: f64, b: f64, c: f64) -> Result<Self> {
        Self::new(center, a, b, c, UnitQuaternion::identity())
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            center: undefined_point(),
            a: f64::NAN,
            b: f64::NAN,
            c: f64::NAN,
            orientation: UnitQuaternion::new_unchecked(nalgebra::Quaternion::new(
                f64::NAN,
                f64::NAN,
                f64::NAN,
                f64::NAN,
            )),
        }
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn first_principal_semi_axis(&self) -> f64 {
        self.a
    }

    #[must_use]
    pub fn second_principal_semi_axis(&self) -> f64 {
        self.b
    }

    #[must_use]
    pub fn third_principal_semi_axis(&self) -> f64 {
        self.c
    }

    #[must_use]
    pub fn orientation(&self) -> &UnitQuaternion {
        &self.orientation
    }

    #[must_use]
    pub fn first_axis(&self) -> Vector3 {
        self.orientation * Vector3::x()
    }

    #[must_use]
    pub fn second_axis(&self) -> Vector3 {
        self.orientation * Vector3::y()
    }

    #[must_use]
    pub fn third_axis(&self) -> Vector3 {
        self.orientation * Vector3::z()
    }

    /// `M = sum_i (axis_i / s_i)(axis_i / s_i)^T`.
    #[must_use]
    pub fn quadratic_form(&self) -> Matrix3 {
        let u = self.first_axis() / self.a;
        let v = self.second_axis() / self.b;
        let w = self.third_axis() / self.c;
        u * u.transpose() + v * v.transpose() + w * w.transpose()
    }

    /// Surface points along an infinite line.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined.
    pub fn intersection_with_line(&self, line: &Line) -> Result<Intersection> {
        ensure_defined(line.is_defined(), "Line")?;
        ensure_defined(self.is_defined(), "Ellipsoid")?;
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
        ensure_defined(self.is_defined(), "Ellipsoid")?;
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
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        if segment.is_degenerate() {
            return Ok(if self.contains(segment.first())? {
                Intersection::point(*segment.first())
            } else {
                Intersection::empty()
            });
        }
        let direction = segment.second() - segment.first();
        let hits = self.surface_hits(segment.first(), &direction, |t| (0.0..=1.0).contains(&t));
        Ok(Intersection::from_hits(hits))
    }

    /// Components of `point - center` along the principal axes.
    fn to_local(&self, point: &Point3) -> Vector3 {
        let offset = point - self.center;
        Vector3::new(
            self.first_axis().dot(&offset),
            self.second_axis().dot(&offset),
            self.third_axis().dot(&offset),
        )
    }

    fn quadric_along(&self, origin: &Point3, direction: &Vector3) -> Quadric {
        let m = self.quadratic_form();
        let offset = origin - self.center;
        let md = m * direction;
        Quadric {
            a2: direction.dot(&md),
            a1: md.dot(&offset),
            a0: offset.dot(&(m * offset)) - 1.0,
        }
    }

    fn surface_hits(
        &self,
        origin: &Point3,
        direction: &Vector3,
        accept: impl Fn(f64) -> bool,
    ) -> Vec<Point3> {
        let q = self.quadric_along(origin, direction);
        reduced_roots(q.a2, q.a1, q.a0)
            .into_iter()
            .filter(|&t| accept(t))
            .map(|t| origin + direction * t)
            .collect()
    }

    fn apply_general(&mut self, transformation: &Transformation) -> Result<()> {
        let inverse = transformation
            .linear_part()
            .try_inverse()
            .ok_or(TransformationError::Singular)?;
        let transformed = inverse.transpose() * self.quadratic_form() * inverse;
        let eigen = SymmetricEigen::new(transformed);

        let [a, b, c] = [0, 1, 2].map(|i| (1.0 / eigen.eigenvalues[i]).sqrt());
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(GeometryError::Degenerate(
                "transformed ellipsoid has a non-positive eigenvalue".into(),
            )
            .into());
        }
        let first = eigen.eigenvectors.column(0).into_owned();
        let second = eigen.eigenvectors.column(1).into_owned();
        let third = first.cross(&second);
        let basis = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[first, second, third]));

        self.center = transformation.apply_to_point(&self.center)?;
        self.a = a;
        self.b = b;
        self.c = c;
        self.orientation = UnitQuaternion::from_rotation_matrix(&basis);
        Ok(())
    }
}

impl PartialEq for Ellipsoid {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        let same_fields = self.center == other.center
            && self.a == other.a
            && self.b == other.b
            && self.c == other.c
            && self.orientation == other.orientation;
        same_fields
            || (self.center == other.center
                && (self.quadratic_form() - other.quadratic_form()).amax() < EPSILON)
    }
}

impl Defined for Ellipsoid {
    fn is_defined(&self) -> bool {
        self.center.is_defined()
            && self.a.is_defined()
            && self.b.is_defined()
            && self.c.is_defined()
            && self.orientation.is_defined()
    }
}

// ── containment ──

impl Contains<Point3> for Ellipsoid {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        let local = self.to_local(point);
        let value = (local.x * local.x) / (self.a * self.a)
            + (local.y * local.y) / (self.b * self.b)
            + (local.z * local.z) / (self.c * self.c);
        Ok((value - 1.0).abs() < EPSILON)
    }
}

impl Contains<PointSet> for Ellipsoid {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(!points.is_empty())
    }
}

impl Contains<Segment> for Ellipsoid {
    fn contains(&self, segment: &Segment) -> Result<bool> {
        ensure_defined(segment.is_defined(), "Segment")?;
        Ok(self.contains(segment.first())? && self.contains(segment.second())?)
    }
}

// ── intersection tests ──

impl Intersects<Point3> for Ellipsoid {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Intersects<PointSet> for Ellipsoid {
    fn intersects(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if self.contains(point)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Intersects<Line> for Ellipsoid {
    fn intersects(&self, line: &Line) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        ensure_defined(line.is_defined(), "Line")?;
        Ok(self.quadric_along(line.origin(), line.direction()).discriminant() >= 0.0)
    }
}

impl Intersects<Ray> for Ellipsoid {
    fn intersects(&self, ray: &Ray) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        ensure_defined(ray.is_defined(), "Ray")?;
        let q = self.quadric_along(ray.origin(), ray.direction());
        if q.a0 <= 0.0 {
            // Origin inside the solid.
            return Ok(true);
        }
        let disc = q.discriminant();
        Ok(disc >= 0.0 && (-q.a1 + disc.sqrt()) / q.a2 >= 0.0)
    }
}

impl Intersects<Segment> for Ellipsoid {
    /// Surface crossing test. A segment lying strictly inside the
    /// ellipsoid does not intersect it.
    fn intersects(&self, segment: &Segment) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        ensure_defined(segment.is_defined(), "Segment")?;

        if segment.is_degenerate() {
            return self.contains(segment.first());
        }

        let half_length = segment.length() / 2.0;
        let q = self.quadric_along(&segment.center(), &segment.direction()?);
        let disc = q.discriminant();

        if disc < -ELLIPSOID_TOLERANCE {
            return Ok(false);
        }

        if disc > ELLIPSOID_TOLERANCE {
            let root = disc.sqrt();
            let t0 = (-q.a1 - root) / q.a2;
            let t1 = (-q.a1 + root) / q.a2;
            let inside = Interval::open(t0.min(t1), t0.max(t1))?;
            let span = Interval::closed(-half_length, half_length)?;
            if inside.contains_interval(&span) {
                return Ok(false);
            }
            return Ok(inside.intersects(&span));
        }

        Ok((-q.a1 / q.a2).abs() <= half_length)
    }
}

impl Intersects<Plane> for Ellipsoid {
    fn intersects(&self, plane: &Plane) -> Result<bool> {
        ensure_defined(self.is_defined(), "Ellipsoid")?;
        let n = plane.normal();
        let reach_sq = (self.a * self.first_axis().dot(n)).powi(2)
            + (self.b * self.second_axis().dot(n)).powi(2)
            + (self.c * self.third_axis().dot(n)).powi(2);
        Ok(plane.signed_distance_to(&self.center)?.abs() <= reach_sq.sqrt())
    }
}

impl Intersects<Pyramid> for Ellipsoid {
    fn intersects(&self, pyramid: &Pyramid) -> Result<bool> {
        pyramid.intersects(self)
    }
}

impl Intersects<Cone> for Ellipsoid {
    fn intersects(&self, cone: &Cone) -> Result<bool> {
        cone.intersects(self)
    }
}

// ── intersections ──

impl IntersectionWith<Line> for Ellipsoid {
    fn intersection_with(&self, line: &Line) -> Result<Intersection> {
        self.intersection_with_line(line)
    }
}

impl IntersectionWith<Ray> for Ellipsoid {
    fn intersection_with(&self, ray: &Ray) -> Result<Intersection> {
        self.intersection_with_ray(ray, false)
    }
}

impl IntersectionWith<Segment> for Ellipsoid {
    fn intersection_with(&self, segment: &Segment) -> Result<Intersection> {
        self.intersection_with_segment(segment)
    }
}

impl IntersectionWith<Pyramid> for Ellipsoid {
    fn intersection_with(&self, pyramid: &Pyramid) -> Result<Intersection> {
        pyramid.intersection_with_ellipsoid(self, &IntersectionParams::default())
    }
}

impl IntersectionWith<Cone> for Ellipsoid {
    fn intersection_with(&self, cone: &Cone) -> Result<Intersection> {
        cone.intersection_with_ellipsoid(self, &IntersectionParams::default())
    }
}

impl Transformable for Ellipsoid {
    /// Rigid motions rotate the principal axes directly; any other
    /// invertible transformation re-derives them from the transformed
    /// quadratic form.
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if !transformation.prepare(self.is_defined(), "Ellipsoid")? {
            return Ok(());
        }
        if !transformation.is_rigid() {
            return self.apply_general(transformation);
        }
        let rotation = Rotation3::from_matrix_unchecked(transformation.linear_part());
        self.center = transformation.apply_to_point(&self.center)?;
        self.orientation = UnitQuaternion::from_rotation_matrix(&rotation) * self.orientation;
        Ok(())
    }
}
