use super::{
    ensure_defined, Composite, Cone, Contains, Ellipsoid, Intersection, IntersectionWith, Intersects, Line,
    LineString, Plane, PointSet, Polygon, Pyramid, Ray, Segment, Sphere, Transformable,
    Transformation,
};
use crate::error::{GeometryError, Result};
use crate::math::{Defined, Point3};

/// Any 3D geometric object.
///
/// Pairwise queries on `Object` dispatch to the concrete algorithms.
/// `intersects` and `intersection_with` are symmetric, so a pair is also
/// tried with its operands swapped; `contains` is not. Pairs without an
/// algorithm fail with [`GeometryError::Unsupported`].
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Point(Point3),
    PointSet(PointSet),
    Line(Line),
    Ray(Ray),
    Segment(Segment),
    LineString(LineString),
    Polygon(Polygon),
    Plane(Plane),
    Sphere(Sphere),
    Ellipsoid(Ellipsoid),
    Pyramid(Pyramid),
    Cone(Cone),
    Composite(Composite),
}

/// Concrete types that an [`Object`] can hold.
pub trait ObjectKind: Sized {
    /// Display name, also used in error messages.
    const NAME: &'static str;

    fn from_object(object: &Object) -> Option<&Self>;
}

macro_rules! object_kinds {
    ($($variant:ident($ty:ty) => $name:literal,)*) => {
        $(
            impl ObjectKind for $ty {
                const NAME: &'static str = $name;

                fn from_object(object: &Object) -> Option<&Self> {
                    match object {
                        Object::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$variant(value)
                }
            }
        )*

        impl Object {
            #[must_use]
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(Object::$variant(_) => $name,)*
                }
            }
        }

        impl Defined for Object {
            fn is_defined(&self) -> bool {
                match self {
                    $(Object::$variant(inner) => inner.is_defined(),)*
                }
            }
        }

        impl Transformable for Object {
            fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
                match self {
                    $(Object::$variant(inner) => inner.apply_transformation(transformation),)*
                }
            }
        }
    };
}

object_kinds! {
    Point(Point3) => "Point",
    PointSet(PointSet) => "PointSet",
    Line(Line) => "Line",
    Ray(Ray) => "Ray",
    Segment(Segment) => "Segment",
    LineString(LineString) => "LineString",
    Polygon(Polygon) => "Polygon",
    Plane(Plane) => "Plane",
    Sphere(Sphere) => "Sphere",
    Ellipsoid(Ellipsoid) => "Ellipsoid",
    Pyramid(Pyramid) => "Pyramid",
    Cone(Cone) => "Cone",
    Composite(Composite) => "Composite",
}

impl Object {
    fn unsupported(&self, operation: &'static str, other: &Object) -> crate::SightlineError {
        GeometryError::Unsupported {
            operation,
            lhs: self.kind_name(),
            rhs: other.kind_name(),
        }
        .into()
    }

    /// Undefined operands fail before any pair lookup, so an unsupported
    /// pair with an undefined side still reports the undefined operand.
    fn ensure_operands_defined(&self, other: &Object) -> Result<()> {
        ensure_defined(self.is_defined(), self.kind_name())?;
        ensure_defined(other.is_defined(), other.kind_name())
    }

    fn intersects_directed(&self, other: &Object) -> Option<Result<bool>> {
        use Object as O;

        Some(match (self, other) {
            (O::Point(a), O::Point(b)) => Ok(a == b),

            (O::Line(a), O::Point(b)) => a.intersects(b),
            (O::Line(a), O::Plane(b)) => a.intersects(b),

            (O::Ray(a), O::Point(b)) => a.intersects(b),
            (O::Ray(a), O::Plane(b)) => a.intersects(b),
            (O::Ray(a), O::Sphere(b)) => a.intersects(b),
            (O::Ray(a), O::Ellipsoid(b)) => a.intersects(b),

            (O::Segment(a), O::Point(b)) => a.intersects(b),
            (O::Segment(a), O::Plane(b)) => a.intersects(b),
            (O::Segment(a), O::Sphere(b)) => a.intersects(b),
            (O::Segment(a), O::Ellipsoid(b)) => a.intersects(b),

            (O::Polygon(a), O::Point(b)) => a.intersects(b),

            (O::Plane(a), O::Point(b)) => a.intersects(b),
            (O::Plane(a), O::PointSet(b)) => a.intersects(b),
            (O::Plane(a), O::Line(b)) => a.intersects(b),
            (O::Plane(a), O::Ray(b)) => a.intersects(b),
            (O::Plane(a), O::Segment(b)) => a.intersects(b),
            (O::Plane(a), O::Sphere(b)) => a.intersects(b),
            (O::Plane(a), O::Ellipsoid(b)) => a.intersects(b),

            (O::Sphere(a), O::Point(b)) => a.intersects(b),
            (O::Sphere(a), O::PointSet(b)) => a.intersects(b),
            (O::Sphere(a), O::Line(b)) => a.intersects(b),
            (O::Sphere(a), O::Ray(b)) => a.intersects(b),
            (O::Sphere(a), O::Segment(b)) => a.intersects(b),
            (O::Sphere(a), O::Plane(b)) => a.intersects(b),
            (O::Sphere(a), O::Pyramid(b)) => a.intersects(b),
            (O::Sphere(a), O::Cone(b)) => a.intersects(b),

            (O::Ellipsoid(a), O::Point(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::PointSet(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::Line(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::Ray(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::Segment(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::Plane(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::Pyramid(b)) => a.intersects(b),
            (O::Ellipsoid(a), O::Cone(b)) => a.intersects(b),

            (O::Pyramid(a), O::Sphere(b)) => a.intersects(b),
            (O::Pyramid(a), O::Ellipsoid(b)) => a.intersects(b),

            (O::Cone(a), O::Sphere(b)) => a.intersects(b),
            (O::Cone(a), O::Ellipsoid(b)) => a.intersects(b),

            _ => return None,
        })
    }

    fn contains_directed(&self, other: &Object) -> Option<Result<bool>> {
        use Object as O;

        Some(match (self, other) {
            (O::Point(a), O::Point(b)) => Ok(a == b),

            (O::Line(a), O::Point(b)) => a.contains(b),
            (O::Line(a), O::PointSet(b)) => a.contains(b),

            (O::Ray(a), O::Point(b)) => a.contains(b),
            (O::Ray(a), O::PointSet(b)) => a.contains(b),

            (O::Segment(a), O::Point(b)) => a.contains(b),

            (O::Polygon(a), O::Point(b)) => a.contains(b),

            (O::Plane(a), O::Point(b)) => a.contains(b),
            (O::Plane(a), O::PointSet(b)) => a.contains(b),
            (O::Plane(a), O::Line(b)) => a.contains(b),
            (O::Plane(a), O::Ray(b)) => a.contains(b),
            (O::Plane(a), O::Segment(b)) => a.contains(b),

            (O::Sphere(a), O::Point(b)) => a.contains(b),
            (O::Sphere(a), O::PointSet(b)) => a.contains(b),

            (O::Ellipsoid(a), O::Point(b)) => a.contains(b),
            (O::Ellipsoid(a), O::PointSet(b)) => a.contains(b),
            (O::Ellipsoid(a), O::Segment(b)) => a.contains(b),

            (O::Pyramid(a), O::Point(b)) => a.contains(b),
            (O::Pyramid(a), O::PointSet(b)) => a.contains(b),
            (O::Pyramid(a), O::Segment(b)) => a.contains(b),

            (O::Cone(a), O::Point(b)) => a.contains(b),
            (O::Cone(a), O::PointSet(b)) => a.contains(b),
            (O::Cone(a), O::Segment(b)) => a.contains(b),
            (O::Cone(a), O::Ray(b)) => a.contains(b),
            (O::Cone(a), O::Sphere(b)) => a.contains(b),

            _ => return None,
        })
    }

    fn intersection_with_directed(&self, other: &Object) -> Option<Result<Intersection>> {
        use Object as O;

        Some(match (self, other) {
            (O::Line(a), O::Plane(b)) => a.intersection_with(b),

            (O::Ray(a), O::Plane(b)) => a.intersection_with(b),
            (O::Ray(a), O::Sphere(b)) => a.intersection_with(b),
            (O::Ray(a), O::Ellipsoid(b)) => a.intersection_with(b),

            (O::Segment(a), O::Plane(b)) => a.intersection_with(b),
            (O::Segment(a), O::Sphere(b)) => a.intersection_with(b),
            (O::Segment(a), O::Ellipsoid(b)) => a.intersection_with(b),

            (O::Plane(a), O::Point(b)) => a.intersection_with(b),
            (O::Plane(a), O::PointSet(b)) => a.intersection_with(b),
            (O::Plane(a), O::Line(b)) => a.intersection_with(b),
            (O::Plane(a), O::Ray(b)) => a.intersection_with(b),
            (O::Plane(a), O::Segment(b)) => a.intersection_with(b),

            (O::Sphere(a), O::Line(b)) => a.intersection_with(b),
            (O::Sphere(a), O::Ray(b)) => a.intersection_with(b),
            (O::Sphere(a), O::Segment(b)) => a.intersection_with(b),
            (O::Sphere(a), O::Pyramid(b)) => a.intersection_with(b),
            (O::Sphere(a), O::Cone(b)) => a.intersection_with(b),

            (O::Ellipsoid(a), O::Line(b)) => a.intersection_with(b),
            (O::Ellipsoid(a), O::Ray(b)) => a.intersection_with(b),
            (O::Ellipsoid(a), O::Segment(b)) => a.intersection_with(b),
            (O::Ellipsoid(a), O::Pyramid(b)) => a.intersection_with(b),
            (O::Ellipsoid(a), O::Cone(b)) => a.intersection_with(b),

            (O::Pyramid(a), O::Sphere(b)) => a.intersection_with(b),
            (O::Pyramid(a), O::Ellipsoid(b)) => a.intersection_with(b),

            (O::Cone(a), O::Sphere(b)) => a.intersection_with(b),
            (O::Cone(a), O::Ellipsoid(b)) => a.intersection_with(b),

            _ => return None,
        })
    }
}

impl Intersects<Object> for Object {
    fn intersects(&self, other: &Object) -> Result<bool> {
        self.ensure_operands_defined(other)?;
        match (self, other) {
            (Object::Composite(composite), _) => composite.intersects(other),
            (_, Object::Composite(composite)) => composite.intersects(self),
            _ => self
                .intersects_directed(other)
                .or_else(|| other.intersects_directed(self))
                .unwrap_or_else(|| Err(self.unsupported("intersects", other))),
        }
    }
}

impl Contains<Object> for Object {
    /// A composite argument is contained when each of its members is, so
    /// an empty one always is.
    fn contains(&self, other: &Object) -> Result<bool> {
        self.ensure_operands_defined(other)?;
        match (self, other) {
            (Object::Composite(composite), _) => composite.contains(other),
            (_, Object::Composite(composite)) => {
                for object in composite.objects()? {
                    if !self.contains(object)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => self
                .contains_directed(other)
                .unwrap_or_else(|| Err(self.unsupported("contains", other))),
        }
    }
}

impl IntersectionWith<Object> for Object {
    fn intersection_with(&self, other: &Object) -> Result<Intersection> {
        self.ensure_operands_defined(other)?;
        match (self, other) {
            (Object::Composite(composite), _) => composite.intersection_with(other),
            (_, Object::Composite(composite)) => composite.intersection_with(self),
            _ => self
                .intersection_with_directed(other)
                .or_else(|| other.intersection_with_directed(self))
                .unwrap_or_else(|| Err(self.unsupported("intersection_with", other))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SightlineError;
    use crate::math::Vector3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn xy_plane() -> Object {
        Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap().into()
    }

    #[test]
    fn names_and_downcasts() {
        let object: Object = Sphere::unit(p(0.0, 0.0, 0.0)).into();
        assert_eq!(object.kind_name(), "Sphere");
        assert!(Sphere::from_object(&object).is_some());
        assert!(Plane::from_object(&object).is_none());
        assert_eq!(<PointSet as ObjectKind>::NAME, "PointSet");
    }

    #[test]
    fn dispatch_swaps_symmetric_pairs() {
        let segment: Object = Segment::new(p(0.0, 0.0, -1.0), p(0.0, 0.0, 1.0)).into();
        let plane = xy_plane();
        assert!(segment.intersects(&plane).unwrap());
        assert!(plane.intersects(&segment).unwrap());
        assert_eq!(
            plane.intersection_with(&segment).unwrap(),
            Intersection::point(p(0.0, 0.0, 0.0))
        );

        let point: Object = p(0.0, 0.0, 1.0).into();
        assert!(point.intersects(&segment).unwrap());
    }

    #[test]
    fn contains_is_not_swapped() {
        let point: Object = p(1.0, 1.0, 0.0).into();
        let plane = xy_plane();
        assert!(plane.contains(&point).unwrap());
        assert!(matches!(
            point.contains(&plane),
            Err(SightlineError::Geometry(GeometryError::Unsupported {
                operation: "contains",
                lhs: "Point",
                rhs: "Plane",
            }))
        ));
    }

    #[test]
    fn unsupported_pairs_are_reported() {
        let line_string: Object = LineString::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).into();
        let sphere: Object = Sphere::unit(p(0.0, 0.0, 0.0)).into();
        assert!(line_string.intersects(&sphere).is_err());
        assert!(line_string.intersection_with(&sphere).is_err());
    }

    #[test]
    fn transformation_reaches_the_variant() {
        let mut object: Object = p(1.0, 0.0, 0.0).into();
        object
            .apply_transformation(&Transformation::translation(&v(0.0, 2.0, 0.0)).unwrap())
            .unwrap();
        assert_eq!(object, Object::Point(p(1.0, 2.0, 0.0)));
        assert!(object.is_defined());
        assert!(!Object::from(Sphere::undefined()).is_defined());
    }

    #[test]
    fn undefined_operands_propagate() {
        let plane = xy_plane();
        let undefined: Object = Segment::undefined().into();
        assert!(plane.intersects(&undefined).is_err());
        assert!(undefined.intersection_with(&plane).is_err());
    }

    #[test]
    fn undefined_points_are_errors_not_mismatches() {
        let origin: Object = p(0.0, 0.0, 0.0).into();
        let nowhere: Object = crate::math::undefined_point().into();
        assert!(matches!(
            origin.intersects(&nowhere),
            Err(SightlineError::Geometry(GeometryError::Undefined("Point")))
        ));
        assert!(origin.contains(&nowhere).is_err());
        assert!(nowhere.contains(&origin).is_err());
    }

    #[test]
    fn undefined_operand_wins_over_unsupported_pair() {
        let undefined_cone: Object = Cone::undefined().into();
        let line: Object = Line::new(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap().into();
        assert!(matches!(
            line.intersects(&undefined_cone),
            Err(SightlineError::Geometry(GeometryError::Undefined("Cone")))
        ));
        assert!(matches!(
            line.intersection_with(&undefined_cone),
            Err(SightlineError::Geometry(GeometryError::Undefined("Cone")))
        ));
    }

    #[test]
    fn empty_composite_argument_is_contained() {
        let empty: Object = Composite::empty().into();
        assert!(xy_plane().contains(&empty).unwrap());
        let undefined: Object = Composite::undefined().into();
        assert!(xy_plane().contains(&undefined).is_err());
    }
}
