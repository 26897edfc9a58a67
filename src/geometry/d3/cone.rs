use std::f64::consts::{PI, TAU};

use nalgebra::Unit;
use tracing::trace;

use super::lateral::{trace_footprint, HitSplit};
use super::{
    ensure_defined, Contains, Ellipsoid, Intersection, IntersectionParams, IntersectionWith,
    Intersects, PointSet, Ray, Segment, Sphere, Transformable, Transformation,
    DEFAULT_DISCRETIZATION_LEVEL,
};
use crate::error::{GeometryError, Result};
use crate::math::{
    any_perpendicular, undefined_point, undefined_vector, Defined, Interval, Point3,
    UnitQuaternion, Vector3, EPSILON,
};

/// An infinite circular cone with its apex, unit axis and half-angle in
/// radians.
#[derive(Debug, Clone)]
pub struct Cone {
    apex: Point3,
    axis: Vector3,
    angle: f64,
}

impl Cone {
    /// The axis is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if `axis` has zero length.
    pub fn new(apex: Point3, axis: Vector3, angle: f64) -> Result<Self> {
        let len = axis.norm();
        if len == 0.0 {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            apex,
            axis: axis / len,
            angle,
        })
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            apex: undefined_point(),
            axis: undefined_vector(),
            angle: f64::NAN,
        }
    }

    #[must_use]
    pub fn apex(&self) -> &Point3 {
        &self.apex
    }

    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Half-angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// `ray_count` rays from the apex evenly spread around the lateral
    /// surface, starting from an arbitrary generatrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the cone is undefined or `ray_count` is zero.
    pub fn rays_of_lateral_surface(&self, ray_count: usize) -> Result<Vec<Ray>> {
        ensure_defined(self.is_defined(), "Cone")?;
        if ray_count == 0 {
            return Err(GeometryError::InvalidArgument("ray count must be positive".into()).into());
        }

        let tilt = UnitQuaternion::from_axis_angle(
            &Unit::new_normalize(any_perpendicular(&self.axis)),
            self.angle,
        );
        let generatrix = tilt * self.axis;

        let angles = if ray_count > 1 {
            Interval::half_open_right(0.0, TAU)?.generate_array_with_size(ray_count)
        } else {
            vec![0.0]
        };

        let axis = Unit::new_unchecked(self.axis);
        let rays = angles
            .into_iter()
            .map(|angle| Ray::new(self.apex, UnitQuaternion::from_axis_angle(&axis, angle) * generatrix))
            .collect::<Result<Vec<_>>>()?;
        trace!(rays = rays.len(), "sampled cone lateral surface");
        Ok(rays)
    }

    /// Distance to the lateral surface, or to the apex for points behind
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cone or the point is undefined.
    pub fn distance_to(&self, point: &Point3) -> Result<f64> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "Cone")?;

        if *point == self.apex {
            return Ok(0.0);
        }
        let to_point = point - self.apex;
        if to_point.dot(&self.axis) < 0.0 {
            return Ok(to_point.norm());
        }

        // Generatrix in the half-plane through the axis and the point.
        let across = self.axis.cross(&to_point);
        let outward = if across.norm() > EPSILON {
            across.cross(&self.axis).normalize()
        } else {
            any_perpendicular(&self.axis)
        };
        let direction = (self.axis + outward * self.angle.tan()).normalize();
        Ray::new(self.apex, direction)?.distance_to(point)
    }

    /// Solid test: any sampled lateral ray reaches the sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined or the level is
    /// zero.
    pub fn intersects_sphere(&self, sphere: &Sphere, discretization_level: usize) -> Result<bool> {
        ensure_defined(sphere.is_defined(), "Sphere")?;
        for ray in self.rays_of_lateral_surface(discretization_level)? {
            if ray.intersects(sphere)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Solid test: any sampled lateral ray reaches the ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined or the level is
    /// zero.
    pub fn intersects_ellipsoid(
        &self,
        ellipsoid: &Ellipsoid,
        discretization_level: usize,
    ) -> Result<bool> {
        ensure_defined(ellipsoid.is_defined(), "Ellipsoid")?;
        for ray in self.rays_of_lateral_surface(discretization_level)? {
            if ray.intersects(ellipsoid)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Approximate trace of the lateral surface on the sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined or the level is
    /// zero.
    pub fn intersection_with_sphere(
        &self,
        sphere: &Sphere,
        params: &IntersectionParams,
    ) -> Result<Intersection> {
        ensure_defined(sphere.is_defined(), "Sphere")?;
        let rays = self.rays_of_lateral_surface(params.discretization_level)?;
        trace_footprint(&self.apex, &rays, params.only_in_sight, HitSplit::EntryApart, |ray| {
            sphere.intersection_with_ray(ray, params.only_in_sight)
        })
    }

    /// Approximate trace of the lateral surface on the ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined or the level is
    /// zero.
    pub fn intersection_with_ellipsoid(
        &self,
        ellipsoid: &Ellipsoid,
        params: &IntersectionParams,
    ) -> Result<Intersection> {
        ensure_defined(ellipsoid.is_defined(), "Ellipsoid")?;
        let rays = self.rays_of_lateral_surface(params.discretization_level)?;
        trace_footprint(&self.apex, &rays, params.only_in_sight, HitSplit::ClosestToApex, |ray| {
            ellipsoid.intersection_with_ray(ray, params.only_in_sight)
        })
    }
}

impl PartialEq for Cone {
    /// A cone also equals the one with the opposite axis and the
    /// supplementary angle.
    fn eq(&self, other: &Self) -> bool {
        if !self.is_defined() || !other.is_defined() {
            return false;
        }
        self.apex == other.apex
            && ((self.axis == other.axis && self.angle == other.angle)
                || (self.axis == -other.axis && self.angle == PI - other.angle))
    }
}

impl Defined for Cone {
    fn is_defined(&self) -> bool {
        self.apex.is_defined() && self.axis.is_defined() && self.angle.is_defined()
    }
}

// ── containment ──

impl Contains<Point3> for Cone {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "Cone")?;
        if *point == self.apex {
            return Ok(true);
        }
        let to_point = point - self.apex;
        if to_point.dot(&self.axis) < 0.0 {
            return Ok(false);
        }
        Ok(to_point.angle(&self.axis) <= self.angle)
    }
}

impl Contains<PointSet> for Cone {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Cone")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(!points.is_empty())
    }
}

impl Contains<Segment> for Cone {
    fn contains(&self, segment: &Segment) -> Result<bool> {
        ensure_defined(segment.is_defined(), "Segment")?;
        Ok(self.contains(segment.first())? && self.contains(segment.second())?)
    }
}

impl Contains<Ray> for Cone {
    fn contains(&self, ray: &Ray) -> Result<bool> {
        ensure_defined(ray.is_defined(), "Ray")?;
        if !self.contains(ray.origin())? {
            return Ok(false);
        }
        Ok(ray.direction().angle(&self.axis) <= self.angle)
    }
}

impl Contains<Sphere> for Cone {
    fn contains(&self, sphere: &Sphere) -> Result<bool> {
        ensure_defined(sphere.is_defined(), "Sphere")?;
        Ok(self.contains(sphere.center())? && self.distance_to(sphere.center())? >= sphere.radius())
    }
}

// ── intersections ──

impl Intersects<Sphere> for Cone {
    fn intersects(&self, sphere: &Sphere) -> Result<bool> {
        self.intersects_sphere(sphere, DEFAULT_DISCRETIZATION_LEVEL)
    }
}

impl Intersects<Ellipsoid> for Cone {
    fn intersects(&self, ellipsoid: &Ellipsoid) -> Result<bool> {
        self.intersects_ellipsoid(ellipsoid, DEFAULT_DISCRETIZATION_LEVEL)
    }
}

impl IntersectionWith<Sphere> for Cone {
    fn intersection_with(&self, sphere: &Sphere) -> Result<Intersection> {
        self.intersection_with_sphere(sphere, &IntersectionParams::default())
    }
}

impl IntersectionWith<Ellipsoid> for Cone {
    fn intersection_with(&self, ellipsoid: &Ellipsoid) -> Result<Intersection> {
        self.intersection_with_ellipsoid(ellipsoid, &IntersectionParams::default())
    }
}

impl Transformable for Cone {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Cone")? {
            let apex = transformation.apply_to_point(&self.apex)?;
            let axis = transformation.apply_to_vector(&self.axis)?;
            *self = Self::new(apex, axis, self.angle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::d3::{IntersectionKind, LineString};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn upright() -> Cone {
        Cone::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 2.0), FRAC_PI_4).unwrap()
    }

    #[test]
    fn construction() {
        assert_eq!(*upright().axis(), v(0.0, 0.0, 1.0));
        assert!(Cone::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0), FRAC_PI_4).is_err());
        assert!(!Cone::undefined().is_defined());
    }

    #[test]
    fn flipped_axis_with_supplementary_angle_is_equal() {
        let flipped = Cone::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, -1.0), PI - FRAC_PI_4).unwrap();
        assert_eq!(upright(), flipped);
        let wider = Cone::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0), FRAC_PI_2).unwrap();
        assert_ne!(upright(), wider);
    }

    #[test]
    fn contains_points_within_half_angle() {
        let cone = upright();
        assert!(cone.contains(&p(0.0, 0.0, 0.0)).unwrap());
        assert!(cone.contains(&p(0.0, 0.0, 1.0)).unwrap());
        assert!(cone.contains(&p(0.5, 0.0, 1.0)).unwrap());
        assert!(!cone.contains(&p(2.0, 0.0, 1.0)).unwrap());
        assert!(!cone.contains(&p(0.0, 0.0, -1.0)).unwrap());
        assert!(cone
            .contains(&Segment::new(p(0.0, 0.0, 1.0), p(0.0, 0.5, 3.0)))
            .unwrap());
    }

    #[test]
    fn contains_rays_pointing_inside() {
        let cone = upright();
        let along = Ray::new(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap();
        let sideways = Ray::new(p(0.0, 0.0, 1.0), v(1.0, 0.0, 0.0)).unwrap();
        assert!(cone.contains(&along).unwrap());
        assert!(!cone.contains(&sideways).unwrap());
    }

    #[test]
    fn distance_to_lateral_surface() {
        let cone = upright();
        assert_relative_eq!(
            cone.distance_to(&p(0.0, 0.0, 1.0)).unwrap(),
            FRAC_PI_4.sin(),
            epsilon = 1e-12
        );
        assert_relative_eq!(cone.distance_to(&p(0.0, 0.0, -3.0)).unwrap(), 3.0);
        assert_eq!(cone.distance_to(&p(0.0, 0.0, 0.0)).unwrap(), 0.0);
    }

    #[test]
    fn contains_spheres_clear_of_the_surface() {
        let cone = upright();
        assert!(cone.contains(&Sphere::new(p(0.0, 0.0, 10.0), 1.0).unwrap()).unwrap());
        assert!(!cone.contains(&Sphere::new(p(0.0, 0.0, 10.0), 8.0).unwrap()).unwrap());
    }

    #[test]
    fn lateral_rays_keep_half_angle() {
        let cone = upright();
        let rays = cone.rays_of_lateral_surface(6).unwrap();
        assert_eq!(rays.len(), 6);
        for ray in &rays {
            assert_relative_eq!(ray.direction().angle(cone.axis()), FRAC_PI_4, epsilon = 1e-12);
        }
        // Opposite generatrices for an even count.
        assert_relative_eq!(rays[0].direction().angle(rays[3].direction()), FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(cone.rays_of_lateral_surface(1).unwrap().len(), 1);
        assert!(cone.rays_of_lateral_surface(0).is_err());
    }

    // ── quadrics ──

    #[test]
    fn lateral_surface_against_spheres() {
        let cone = upright();
        assert!(cone.intersects(&Sphere::new(p(0.0, 0.0, 10.0), 8.0).unwrap()).unwrap());
        assert!(!cone.intersects(&Sphere::new(p(0.0, 0.0, 10.0), 1.0).unwrap()).unwrap());
    }

    #[test]
    fn footprint_on_sphere_in_sight() {
        let cone = upright();
        let sphere = Sphere::new(p(0.0, 0.0, 10.0), 8.0).unwrap();
        let params = IntersectionParams {
            only_in_sight: true,
            discretization_level: 4,
        };
        let footprint = cone.intersection_with_sphere(&sphere, &params).unwrap();
        let line = footprint.downcast::<LineString>().unwrap();
        assert_eq!(line.point_count(), 4);
        for point in line {
            assert_relative_eq!((point - sphere.center()).norm(), 8.0, epsilon = 1e-9);
            assert!(point.z < 10.0);
        }
    }

    #[test]
    fn footprint_on_ellipsoid_has_both_strings() {
        let cone = upright();
        let ellipsoid = Ellipsoid::aligned(p(0.0, 0.0, 10.0), 8.0, 8.0, 9.0).unwrap();
        let footprint = cone.intersection_with(&ellipsoid).unwrap();
        assert_eq!(footprint.kind(), IntersectionKind::LineString);
        assert_eq!(footprint.objects().len(), 2);
    }

    #[test]
    fn rotation_turns_axis() {
        let mut cone = upright();
        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);
        cone.apply_transformation(&Transformation::rotation(&q).unwrap())
            .unwrap();
        assert_relative_eq!(*cone.axis(), v(0.0, -1.0, 0.0), epsilon = 1e-12);
        assert_eq!(cone.angle(), FRAC_PI_4);
    }

    #[test]
    fn undefined_operands_fail() {
        assert!(Cone::undefined().contains(&p(0.0, 0.0, 1.0)).is_err());
        assert!(upright().intersects(&Ellipsoid::undefined()).is_err());
        assert!(upright().distance_to(&crate::math::undefined_point()).is_err());
    }
}
