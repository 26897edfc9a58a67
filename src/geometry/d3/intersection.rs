use std::fmt;

use super::{Line, LineString, Object, ObjectKind, PointSet, Ray, Segment};
use crate::error::{IntersectionError, Result};
use crate::math::{Point3, EPSILON};

/// Shape of an [`Intersection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    Undefined,
    Empty,
    Point,
    PointSet,
    Line,
    Ray,
    Segment,
    LineString,
    Polygon,
    Plane,
    Sphere,
    Ellipsoid,
    Pyramid,
    Cone,
    /// Objects of more than one kind.
    Complex,
}

impl IntersectionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::Empty => "Empty",
            Self::Point => "Point",
            Self::PointSet => "PointSet",
            Self::Line => "Line",
            Self::Ray => "Ray",
            Self::Segment => "Segment",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::Plane => "Plane",
            Self::Sphere => "Sphere",
            Self::Ellipsoid => "Ellipsoid",
            Self::Pyramid => "Pyramid",
            Self::Cone => "Cone",
            Self::Complex => "Complex",
        }
    }

    fn of(object: &Object) -> Self {
        match object {
            Object::Point(_) => Self::Point,
            Object::PointSet(_) => Self::PointSet,
            Object::Line(_) => Self::Line,
            Object::Ray(_) => Self::Ray,
            Object::Segment(_) => Self::Segment,
            Object::LineString(_) => Self::LineString,
            Object::Polygon(_) => Self::Polygon,
            Object::Plane(_) => Self::Plane,
            Object::Sphere(_) => Self::Sphere,
            Object::Ellipsoid(_) => Self::Ellipsoid,
            Object::Pyramid(_) => Self::Pyramid,
            Object::Cone(_) => Self::Cone,
            Object::Composite(_) => Self::Complex,
        }
    }

    /// Uniform lists take the kind of their members; mixed ones are complex.
    fn of_all(objects: &[Object]) -> Self {
        let mut kinds = objects.iter().map(Self::of);
        let Some(first) = kinds.next() else {
            return Self::Empty;
        };
        if kinds.all(|kind| kind == first) {
            first
        } else {
            Self::Complex
        }
    }
}

impl fmt::Display for IntersectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of intersecting two objects.
///
/// An empty intersection is a valid result; an undefined one means no
/// computation took place. Equality compares the kind and the stored
/// objects in order.
#[derive(Debug, Clone)]
pub struct Intersection {
    kind: IntersectionKind,
    objects: Vec<Object>,
}

impl Intersection {
    /// Classifies `objects` by kind. An empty list yields an empty
    /// intersection.
    #[must_use]
    pub fn from_objects(objects: Vec<Object>) -> Self {
        Self {
            kind: IntersectionKind::of_all(&objects),
            objects,
        }
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            kind: IntersectionKind::Undefined,
            objects: Vec::new(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            kind: IntersectionKind::Empty,
            objects: Vec::new(),
        }
    }

    #[must_use]
    pub fn point(point: Point3) -> Self {
        Self::single(IntersectionKind::Point, Object::Point(point))
    }

    #[must_use]
    pub fn point_set(points: PointSet) -> Self {
        Self::single(IntersectionKind::PointSet, Object::PointSet(points))
    }

    #[must_use]
    pub fn line(line: Line) -> Self {
        Self::single(IntersectionKind::Line, Object::Line(line))
    }

    #[must_use]
    pub fn ray(ray: Ray) -> Self {
        Self::single(IntersectionKind::Ray, Object::Ray(ray))
    }

    #[must_use]
    pub fn segment(segment: Segment) -> Self {
        Self::single(IntersectionKind::Segment, Object::Segment(segment))
    }

    #[must_use]
    pub fn line_string(line_string: LineString) -> Self {
        Self::single(IntersectionKind::LineString, Object::LineString(line_string))
    }

    /// Surface hits along a parametrized curve, in parameter order.
    ///
    /// Hits closer than [`EPSILON`] are merged, so a tangent contact is a
    /// single point.
    #[must_use]
    pub fn from_hits(mut hits: Vec<Point3>) -> Self {
        hits.dedup_by(|b, a| (*b - *a).norm() < EPSILON);
        match hits.len() {
            0 => Self::empty(),
            1 => Self::point(hits[0]),
            _ => Self::point_set(PointSet::new(hits)),
        }
    }

    /// Like [`Intersection::from_hits`]; with `only_in_sight`, keeps only
    /// the first hit along the ray.
    #[must_use]
    pub fn from_ray_hits(mut hits: Vec<Point3>, only_in_sight: bool) -> Self {
        if only_in_sight {
            hits.truncate(1);
        }
        Self::from_hits(hits)
    }

    fn single(kind: IntersectionKind, object: Object) -> Self {
        Self {
            kind,
            objects: vec![object],
        }
    }

    #[must_use]
    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.kind != IntersectionKind::Undefined
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind == IntersectionKind::Empty
    }

    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.kind == IntersectionKind::Complex
    }

    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Returns `true` if the first stored object is a `T`.
    #[must_use]
    pub fn is<T: ObjectKind>(&self) -> bool {
        self.objects.first().and_then(T::from_object).is_some()
    }

    /// Borrows the first stored object as a `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection is undefined, empty, or holds
    /// something else.
    pub fn downcast<T: ObjectKind>(&self) -> Result<&T> {
        if !self.is_defined() {
            return Err(IntersectionError::Undefined.into());
        }
        let first = self.objects.first().ok_or(IntersectionError::Empty)?;
        T::from_object(first).ok_or_else(|| {
            IntersectionError::WrongType {
                expected: T::NAME,
                actual: first.kind_name(),
            }
            .into()
        })
    }

    /// Objects of `self` followed by those of `other`, reclassified.
    ///
    /// # Errors
    ///
    /// Returns an error if either intersection is undefined.
    pub fn concatenated(&self, other: &Intersection) -> Result<Intersection> {
        let mut result = self.clone();
        result.extend(other)?;
        Ok(result)
    }

    /// Appends the objects of `other` and reclassifies.
    ///
    /// # Errors
    ///
    /// Returns an error if either intersection is undefined.
    pub fn extend(&mut self, other: &Intersection) -> Result<()> {
        if !self.is_defined() || !other.is_defined() {
            return Err(IntersectionError::Undefined.into());
        }
        self.objects.extend(other.objects.iter().cloned());
        self.kind = IntersectionKind::of_all(&self.objects);
        Ok(())
    }

    /// Name of an intersection kind.
    #[must_use]
    pub fn string_from_type(kind: IntersectionKind) -> &'static str {
        kind.as_str()
    }
}

impl PartialEq for Intersection {
    fn eq(&self, other: &Self) -> bool {
        self.is_defined()
            && other.is_defined()
            && self.kind == other.kind
            && self.objects == other.objects
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} intersection ({} objects)", self.kind, self.objects.len())
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

    #[test]
    fn empty_is_defined_undefined_is_not() {
        assert!(Intersection::empty().is_defined());
        assert!(Intersection::empty().is_empty());
        assert!(!Intersection::undefined().is_defined());
        assert!(!Intersection::undefined().is_empty());
        assert_ne!(Intersection::undefined(), Intersection::undefined());
        assert_eq!(Intersection::empty(), Intersection::from_objects(Vec::new()));
    }

    #[test]
    fn kinds_from_objects() {
        let point = Object::Point(p(0.0, 0.0, 0.0));
        let segment = Object::Segment(Segment::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)));
        assert_eq!(
            Intersection::from_objects(vec![point.clone()]).kind(),
            IntersectionKind::Point
        );
        assert_eq!(
            Intersection::from_objects(vec![point.clone(), point.clone()]).kind(),
            IntersectionKind::Point
        );
        let mixed = Intersection::from_objects(vec![point, segment]);
        assert!(mixed.is_complex());
        assert_eq!(Intersection::string_from_type(mixed.kind()), "Complex");
        assert_eq!(Intersection::string_from_type(IntersectionKind::Undefined), "Undefined");
    }

    #[test]
    fn downcast_checks_kind() {
        let hit = Intersection::point(p(1.0, 2.0, 3.0));
        assert!(hit.is::<Point3>());
        assert!(!hit.is::<Segment>());
        assert_eq!(*hit.downcast::<Point3>().unwrap(), p(1.0, 2.0, 3.0));
        assert!(matches!(
            hit.downcast::<Segment>(),
            Err(SightlineError::Intersection(IntersectionError::WrongType {
                expected: "Segment",
                actual: "Point",
            }))
        ));
        assert!(matches!(
            Intersection::empty().downcast::<Point3>(),
            Err(SightlineError::Intersection(IntersectionError::Empty))
        ));
        assert!(!Intersection::empty().is::<Point3>());
    }

    #[test]
    fn hits_collapse_and_respect_sight() {
        assert!(Intersection::from_hits(Vec::new()).is_empty());
        assert_eq!(
            Intersection::from_hits(vec![p(1.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]),
            Intersection::point(p(1.0, 0.0, 0.0))
        );
        let two = vec![p(1.0, 0.0, 0.0), p(3.0, 0.0, 0.0)];
        assert_eq!(
            Intersection::from_ray_hits(two.clone(), false).kind(),
            IntersectionKind::PointSet
        );
        assert_eq!(
            Intersection::from_ray_hits(two, true),
            Intersection::point(p(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn concatenation_keeps_order_and_reclassifies() {
        let a = Intersection::point(p(0.0, 0.0, 0.0));
        let b = Intersection::line(Line::new(p(0.0, 0.0, 0.0), Vector3::x()).unwrap());
        let joined = a.concatenated(&b).unwrap();
        assert_eq!(joined.kind(), IntersectionKind::Complex);
        assert!(matches!(joined.objects()[0], Object::Point(_)));
        assert!(matches!(joined.objects()[1], Object::Line(_)));

        let mut grown = Intersection::empty();
        grown.extend(&a).unwrap();
        assert_eq!(grown, a);
        assert!(grown.extend(&Intersection::undefined()).is_err());
    }

    #[test]
    fn equality_is_ordered() {
        let a = Intersection::from_objects(vec![
            Object::Point(p(0.0, 0.0, 0.0)),
            Object::Point(p(1.0, 0.0, 0.0)),
        ]);
        let b = Intersection::from_objects(vec![
            Object::Point(p(1.0, 0.0, 0.0)),
            Object::Point(p(0.0, 0.0, 0.0)),
        ]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
