use nalgebra::Unit;
use tracing::trace;

use super::lateral::{trace_footprint, HitSplit};
use super::{
    ensure_defined, Contains, Ellipsoid, Intersection, IntersectionParams, IntersectionWith,
    Intersects, Object, PointSet, Polygon, Ray, Segment, Sphere, Transformable, Transformation,
    DEFAULT_DISCRETIZATION_LEVEL,
};
use crate::error::{GeometryError, Result};
use crate::geometry::d2;
use crate::math::{undefined_point, Defined, Interval, Point2, Point3, UnitQuaternion};

/// A pyramid with a planar polygonal base and an apex.
///
/// The lateral surface extends past the base: containment tests the
/// infinite pyramid bounded only by the apex.
#[derive(Debug, Clone)]
pub struct Pyramid {
    base: Polygon,
    apex: Point3,
}

impl Pyramid {
    #[must_use]
    pub fn new(base: Polygon, apex: Point3) -> Self {
        Self { base, apex }
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            base: Polygon::undefined(),
            apex: undefined_point(),
        }
    }

    #[must_use]
    pub fn base(&self) -> &Polygon {
        &self.base
    }

    #[must_use]
    pub fn apex(&self) -> &Point3 {
        &self.apex
    }

    /// One lateral face per base edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the pyramid is undefined.
    pub fn lateral_face_count(&self) -> Result<usize> {
        ensure_defined(self.is_defined(), "Pyramid")?;
        Ok(self.base.edge_count())
    }

    /// Triangle spanned by the apex and base edge `index`, expressed in a
    /// frame whose origin is the apex and whose x axis points at the first
    /// edge vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the pyramid is undefined, `index` is out of
    /// bounds, or the face is degenerate.
    pub fn lateral_face_at(&self, index: usize) -> Result<Polygon> {
        ensure_defined(self.is_defined(), "Pyramid")?;
        let edge = self.base.edge_at(index)?;

        let to_first = edge.first() - self.apex;
        let x_axis = to_first.normalize();
        let to_second = (edge.second() - self.apex).normalize();
        let y_axis = x_axis.cross(&to_second).cross(&x_axis).normalize();

        let edge_vector = edge.second() - edge.first();
        let second = Point2::new(to_first.norm(), 0.0);
        let third = Point2::new(
            second.x + edge_vector.dot(&x_axis),
            second.y + edge_vector.dot(&y_axis),
        );
        let triangle = d2::Polygon::simple(vec![Point2::origin(), second, third])?;

        Polygon::new(triangle, self.apex, x_axis, y_axis)
    }

    /// Rays from the apex sweeping lateral face `index` from its first
    /// base vertex to its second, both included.
    ///
    /// # Errors
    ///
    /// Returns an error if the pyramid is undefined or `index` is out of
    /// bounds.
    pub fn rays_of_lateral_face_at(&self, index: usize, ray_count: usize) -> Result<Vec<Ray>> {
        ensure_defined(self.is_defined(), "Pyramid")?;
        let edge = self.base.edge_at(index)?;

        let first = (edge.first() - self.apex).normalize();
        let second = (edge.second() - self.apex).normalize();
        if first == second {
            return Ok(vec![Ray::new(self.apex, first)?]);
        }

        let axis = Unit::new_normalize(first.cross(&second));
        let angles = if ray_count > 1 {
            Interval::closed(0.0, first.angle(&second))?.generate_array_with_size(ray_count)
        } else {
            vec![0.0]
        };

        angles
            .into_iter()
            .map(|angle| Ray::new(self.apex, UnitQuaternion::from_axis_angle(&axis, angle) * first))
            .collect()
    }

    /// `ray_count / lateral_face_count` rays per face, face after face.
    /// Rays on shared edges are emitted once per adjacent face.
    ///
    /// # Errors
    ///
    /// Returns an error if the pyramid is undefined or `ray_count` is
    /// lower than the number of lateral faces.
    pub fn rays_of_lateral_faces(&self, ray_count: usize) -> Result<Vec<Ray>> {
        let face_count = self.lateral_face_count()?;
        if ray_count < face_count {
            return Err(GeometryError::InvalidArgument(format!(
                "ray count {ray_count} is lower than lateral face count {face_count}"
            ))
            .into());
        }
        let per_face = ray_count / face_count;
        let mut rays = Vec::with_capacity(per_face * face_count);
        for index in 0..face_count {
            rays.extend(self.rays_of_lateral_face_at(index, per_face)?);
        }
        trace!(faces = face_count, rays = rays.len(), "sampled pyramid lateral faces");
        Ok(rays)
    }

    /// Solid test: any sampled lateral ray reaches the sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined or the level is too
    /// low for the number of faces.
    pub fn intersects_sphere(&self, sphere: &Sphere, discretization_level: usize) -> Result<bool> {
        ensure_defined(sphere.is_defined(), "Sphere")?;
        for ray in self.rays_of_lateral_faces(discretization_level)? {
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
    /// Returns an error if either operand is undefined or the level is too
    /// low for the number of faces.
    pub fn intersects_ellipsoid(
        &self,
        ellipsoid: &Ellipsoid,
        discretization_level: usize,
    ) -> Result<bool> {
        ensure_defined(ellipsoid.is_defined(), "Ellipsoid")?;
        for ray in self.rays_of_lateral_faces(discretization_level)? {
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
    /// Returns an error if either operand is undefined or the level is too
    /// low for the number of faces.
    pub fn intersection_with_sphere(
        &self,
        sphere: &Sphere,
        params: &IntersectionParams,
    ) -> Result<Intersection> {
        ensure_defined(sphere.is_defined(), "Sphere")?;
        let rays = self.rays_of_lateral_faces(params.discretization_level)?;
        trace_footprint(&self.apex, &rays, params.only_in_sight, HitSplit::EntryApart, |ray| {
            sphere.intersection_with_ray(ray, params.only_in_sight)
        })
    }

    /// Approximate trace of the lateral surface on the ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is undefined or the level is too
    /// low for the number of faces.
    pub fn intersection_with_ellipsoid(
        &self,
        ellipsoid: &Ellipsoid,
        params: &IntersectionParams,
    ) -> Result<Intersection> {
        ensure_defined(ellipsoid.is_defined(), "Ellipsoid")?;
        let rays = self.rays_of_lateral_faces(params.discretization_level)?;
        trace_footprint(&self.apex, &rays, params.only_in_sight, HitSplit::ClosestToApex, |ray| {
            ellipsoid.intersection_with_ray(ray, params.only_in_sight)
        })
    }
}

impl PartialEq for Pyramid {
    fn eq(&self, other: &Self) -> bool {
        self.is_defined() && other.is_defined() && self.base == other.base && self.apex == other.apex
    }
}

impl Defined for Pyramid {
    fn is_defined(&self) -> bool {
        self.base.is_defined() && self.apex.is_defined()
    }
}

// ── containment ──

impl Contains<Point3> for Pyramid {
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(point.is_defined(), "Point")?;
        ensure_defined(self.is_defined(), "Pyramid")?;

        if *point == self.apex {
            return Ok(true);
        }

        // Project along the apex ray onto the base plane.
        let ray = Ray::new(self.apex, point - self.apex)?;
        let hit = ray.intersection_with(&self.base.to_plane()?)?;
        match hit.objects() {
            [] => Ok(false),
            [Object::Point(projected)] => self.base.polygon2d().contains(&self.base.to_local(projected)),
            _ => Err(GeometryError::Degenerate("pyramid apex lies in its base plane".into()).into()),
        }
    }
}

impl Contains<PointSet> for Pyramid {
    fn contains(&self, points: &PointSet) -> Result<bool> {
        ensure_defined(self.is_defined(), "Pyramid")?;
        ensure_defined(points.is_defined(), "PointSet")?;
        for point in points {
            if !self.contains(point)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Contains<Segment> for Pyramid {
    fn contains(&self, segment: &Segment) -> Result<bool> {
        ensure_defined(segment.is_defined(), "Segment")?;
        Ok(self.contains(segment.first())? && self.contains(segment.second())?)
    }
}

// ── intersections ──

impl Intersects<Sphere> for Pyramid {
    fn intersects(&self, sphere: &Sphere) -> Result<bool> {
        self.intersects_sphere(sphere, DEFAULT_DISCRETIZATION_LEVEL)
    }
}

impl Intersects<Ellipsoid> for Pyramid {
    fn intersects(&self, ellipsoid: &Ellipsoid) -> Result<bool> {
        self.intersects_ellipsoid(ellipsoid, DEFAULT_DISCRETIZATION_LEVEL)
    }
}

impl IntersectionWith<Sphere> for Pyramid {
    fn intersection_with(&self, sphere: &Sphere) -> Result<Intersection> {
        self.intersection_with_sphere(sphere, &IntersectionParams::default())
    }
}

impl IntersectionWith<Ellipsoid> for Pyramid {
    fn intersection_with(&self, ellipsoid: &Ellipsoid) -> Result<Intersection> {
        self.intersection_with_ellipsoid(ellipsoid, &IntersectionParams::default())
    }
}

impl Transformable for Pyramid {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Pyramid")? {
            self.base.apply_transformation(transformation)?;
            self.apex = transformation.apply_to_point(&self.apex)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::d3::{IntersectionKind, LineString};
    use crate::math::{is_near, Vector3};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    /// Square base of half-width 0.1 one unit above the apex at the origin.
    fn narrow_pyramid() -> Pyramid {
        let square = d2::Polygon::simple(vec![
            Point2::new(-0.1, -0.1),
            Point2::new(-0.1, 0.1),
            Point2::new(0.1, 0.1),
            Point2::new(0.1, -0.1),
        ])
        .unwrap();
        let base = Polygon::new(square, p(0.0, 0.0, 1.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)).unwrap();
        Pyramid::new(base, p(0.0, 0.0, 0.0))
    }

    #[test]
    fn lateral_faces() {
        let pyramid = narrow_pyramid();
        assert_eq!(pyramid.lateral_face_count().unwrap(), 4);

        let face = pyramid.lateral_face_at(1).unwrap();
        assert_eq!(*face.origin(), p(0.0, 0.0, 0.0));
        assert_relative_eq!(face.vertex_at(1).unwrap(), p(-0.1, 0.1, 1.0), epsilon = 1e-12);
        assert_relative_eq!(face.vertex_at(2).unwrap(), p(0.1, 0.1, 1.0), epsilon = 1e-12);
        assert!(pyramid.lateral_face_at(4).is_err());
    }

    #[test]
    fn face_rays_sweep_from_first_to_second_vertex() {
        let pyramid = narrow_pyramid();
        let rays = pyramid.rays_of_lateral_face_at(0, 3).unwrap();
        assert_eq!(rays.len(), 3);
        let first = v(-0.1, -0.1, 1.0).normalize();
        let middle = v(-0.1, 0.0, 1.0).normalize();
        let last = v(-0.1, 0.1, 1.0).normalize();
        assert_relative_eq!(*rays[0].direction(), first, epsilon = 1e-12);
        assert_relative_eq!(*rays[1].direction(), middle, epsilon = 1e-12);
        assert_relative_eq!(*rays[2].direction(), last, epsilon = 1e-12);

        assert_eq!(pyramid.rays_of_lateral_face_at(0, 1).unwrap().len(), 1);
    }

    #[test]
    fn ray_count_must_cover_every_face() {
        let pyramid = narrow_pyramid();
        assert!(pyramid.rays_of_lateral_faces(3).is_err());
        assert_eq!(pyramid.rays_of_lateral_faces(8).unwrap().len(), 8);
        assert_eq!(pyramid.rays_of_lateral_faces(10).unwrap().len(), 8);
    }

    #[test]
    fn contains_points_inside_the_infinite_pyramid() {
        let pyramid = narrow_pyramid();
        assert!(pyramid.contains(&p(0.0, 0.0, 0.0)).unwrap());
        assert!(pyramid.contains(&p(0.0, 0.0, 5.0)).unwrap());
        assert!(pyramid.contains(&p(0.025, 0.025, 0.5)).unwrap());
        assert!(!pyramid.contains(&p(0.0, 0.0, -1.0)).unwrap());
        assert!(!pyramid.contains(&p(1.0, 0.0, 1.0)).unwrap());

        let inside = Segment::new(p(0.0, 0.0, 2.0), p(0.05, 0.0, 2.0));
        let leaving = Segment::new(p(0.0, 0.0, 2.0), p(2.0, 0.0, 2.0));
        assert!(pyramid.contains(&inside).unwrap());
        assert!(!pyramid.contains(&leaving).unwrap());

        let points = PointSet::new(vec![p(0.0, 0.0, 2.0), p(0.05, 0.0, 2.0)]);
        assert!(pyramid.contains(&points).unwrap());
        assert!(pyramid.contains(&PointSet::empty()).unwrap());
    }

    // ── quadrics ──

    #[test]
    fn ellipsoid_footprint_in_sight() {
        let pyramid = narrow_pyramid();
        let ellipsoid = Ellipsoid::aligned(p(0.0, 0.0, 10.0), 5.0, 5.0, 5.0).unwrap();
        let params = IntersectionParams {
            only_in_sight: true,
            discretization_level: 8,
        };
        let footprint = pyramid.intersection_with_ellipsoid(&ellipsoid, &params).unwrap();
        assert_eq!(footprint.kind(), IntersectionKind::LineString);

        let c = 0.505_129_425_743_498;
        let h = 5.051_294_257_434_98;
        let expected = LineString::new(vec![
            p(-c, -c, h),
            p(-c, c, h),
            p(-c, c, h),
            p(c, c, h),
            p(c, c, h),
            p(c, -c, h),
            p(c, -c, h),
            p(-c, -c, h),
        ]);
        let line = footprint.downcast::<LineString>().unwrap();
        assert_eq!(line.point_count(), 8);
        for (actual, wanted) in line.iter().zip(expected.iter()) {
            assert!(is_near(actual, wanted, 1e-10), "{actual} vs {wanted}");
        }
    }

    #[test]
    fn sphere_footprint_lists_exit_points_first() {
        let pyramid = narrow_pyramid();
        let sphere = Sphere::new(p(0.0, 0.0, 10.0), 5.0).unwrap();
        let footprint = pyramid.intersection_with(&sphere).unwrap();
        assert_eq!(footprint.kind(), IntersectionKind::LineString);
        assert_eq!(footprint.objects().len(), 2);
        for object in footprint.objects() {
            let Object::LineString(line) = object else {
                panic!("expected a line string, got {}", object.kind_name());
            };
            assert_eq!(line.point_count(), DEFAULT_DISCRETIZATION_LEVEL);
        }
        let (Object::LineString(exits), Object::LineString(entries)) =
            (&footprint.objects()[0], &footprint.objects()[1])
        else {
            unreachable!()
        };
        assert!(exits.iter().all(|point| point.z > 10.0));
        assert!(entries.iter().all(|point| point.z < 10.0));
    }

    #[test]
    fn solid_tests_against_quadrics() {
        let pyramid = narrow_pyramid();
        assert!(pyramid
            .intersects(&Sphere::new(p(0.0, 0.0, 10.0), 5.0).unwrap())
            .unwrap());
        assert!(!pyramid
            .intersects(&Sphere::new(p(10.0, 0.0, 0.0), 1.0).unwrap())
            .unwrap());
        let far = Ellipsoid::aligned(p(0.0, 10.0, 0.0), 1.0, 2.0, 1.0).unwrap();
        assert!(!pyramid.intersects(&far).unwrap());
        assert!(pyramid
            .intersection_with(&far)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn translation_round_trip() {
        let original = narrow_pyramid();
        let mut pyramid = original.clone();
        let offset = v(1.0, 2.0, 3.0);
        pyramid
            .apply_transformation(&Transformation::translation(&offset).unwrap())
            .unwrap();
        assert_eq!(*pyramid.apex(), p(1.0, 2.0, 3.0));
        pyramid
            .apply_transformation(&Transformation::translation(&-offset).unwrap())
            .unwrap();
        assert_eq!(*pyramid.apex(), *original.apex());
        assert!(pyramid.base().is_near(original.base(), 1e-12).unwrap());
    }

    #[test]
    fn undefined_operands_fail() {
        let pyramid = narrow_pyramid();
        assert!(Pyramid::undefined().contains(&p(0.0, 0.0, 1.0)).is_err());
        assert!(pyramid.intersects(&Sphere::undefined()).is_err());
        assert!(pyramid
            .intersection_with_ellipsoid(&Ellipsoid::undefined(), &IntersectionParams::default())
            .is_err());
    }
}
