use tracing::debug;

use super::{
    ensure_defined, Contains, Intersection, IntersectionWith, Intersects, Object, Transformable,
    Transformation,
};
use crate::error::{GeometryError, Result};
use crate::math::Defined;

/// An ordered collection of objects handled as one.
///
/// `intersects` holds when any member intersects the argument; `contains`
/// holds when every member contains it, vacuously so for an empty
/// composite (see [`Composite::contains_any`] for the union reading).
#[derive(Debug, Clone)]
pub struct Composite {
    defined: bool,
    objects: Vec<Object>,
}

impl Composite {
    #[must_use]
    pub fn new(objects: Vec<Object>) -> Self {
        Self {
            defined: true,
            objects,
        }
    }

    #[must_use]
    pub fn from_object(object: impl Into<Object>) -> Self {
        Self::new(vec![object.into()])
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            defined: false,
            objects: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the composite is undefined.
    pub fn is_empty(&self) -> Result<bool> {
        self.ensure_defined()?;
        Ok(self.objects.is_empty())
    }

    /// # Errors
    ///
    /// Returns an error if the composite is undefined.
    pub fn object_count(&self) -> Result<usize> {
        self.ensure_defined()?;
        Ok(self.objects.len())
    }

    /// # Errors
    ///
    /// Returns an error if the composite is undefined or `index` is out of
    /// bounds.
    pub fn object_at(&self, index: usize) -> Result<&Object> {
        self.ensure_defined()?;
        self.objects.get(index).ok_or_else(|| {
            GeometryError::IndexOutOfBounds {
                what: "object",
                index,
                len: self.objects.len(),
            }
            .into()
        })
    }

    /// # Errors
    ///
    /// Returns an error if the composite is undefined.
    pub fn objects(&self) -> Result<&[Object]> {
        self.ensure_defined()?;
        Ok(&self.objects)
    }

    /// Objects of `self` followed by those of `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if either composite is undefined.
    pub fn concatenated(&self, other: &Composite) -> Result<Composite> {
        let mut result = self.clone();
        result.extend(other)?;
        Ok(result)
    }

    /// Appends copies of the objects of `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if either composite is undefined.
    pub fn extend(&mut self, other: &Composite) -> Result<()> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        self.objects.extend(other.objects.iter().cloned());
        Ok(())
    }

    /// Returns `true` if at least one member contains `object`.
    ///
    /// # Errors
    ///
    /// Returns an error if anything is undefined or a member has no
    /// containment test for `object`.
    pub fn contains_any(&self, object: &Object) -> Result<bool> {
        ensure_defined(object.is_defined(), object.kind_name())?;
        self.ensure_defined()?;
        for member in &self.objects {
            if member.contains(object)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn ensure_defined(&self) -> Result<()> {
        ensure_defined(self.is_defined(), "Composite")
    }
}

impl PartialEq for Composite {
    fn eq(&self, other: &Self) -> bool {
        self.is_defined() && other.is_defined() && self.objects == other.objects
    }
}

impl Defined for Composite {
    fn is_defined(&self) -> bool {
        self.defined && self.objects.iter().all(Defined::is_defined)
    }
}

impl<T: Into<Object>> FromIterator<T> for Composite {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl Intersects<Object> for Composite {
    fn intersects(&self, object: &Object) -> Result<bool> {
        ensure_defined(object.is_defined(), object.kind_name())?;
        self.ensure_defined()?;
        if let Object::Composite(other) = object {
            return self.intersects(other);
        }
        for member in &self.objects {
            if member.intersects(object)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Intersects<Composite> for Composite {
    fn intersects(&self, other: &Composite) -> Result<bool> {
        other.ensure_defined()?;
        self.ensure_defined()?;
        for object in other.objects()? {
            if self.intersects(object)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Contains<Object> for Composite {
    /// Every member must contain `object`.
    fn contains(&self, object: &Object) -> Result<bool> {
        ensure_defined(object.is_defined(), object.kind_name())?;
        self.ensure_defined()?;
        if let Object::Composite(other) = object {
            return self.contains(other);
        }
        for member in &self.objects {
            if !member.contains(object)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Contains<Composite> for Composite {
    /// Every object of `other` must be contained.
    fn contains(&self, other: &Composite) -> Result<bool> {
        other.ensure_defined()?;
        self.ensure_defined()?;
        for object in &other.objects {
            if !self.contains(object)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl IntersectionWith<Object> for Composite {
    /// Accumulates the non-empty intersections of every member.
    fn intersection_with(&self, object: &Object) -> Result<Intersection> {
        ensure_defined(object.is_defined(), object.kind_name())?;
        self.ensure_defined()?;
        if let Object::Composite(other) = object {
            return self.intersection_with(other);
        }
        let mut accumulated = Intersection::empty();
        for member in &self.objects {
            let intersection = member.intersection_with(object)?;
            if intersection.is_defined() && !intersection.is_empty() {
                accumulated.extend(&intersection)?;
            }
        }
        debug!(
            members = self.objects.len(),
            kind = %accumulated.kind(),
            "composite intersection accumulated"
        );
        Ok(accumulated)
    }
}

impl IntersectionWith<Composite> for Composite {
    fn intersection_with(&self, other: &Composite) -> Result<Intersection> {
        other.ensure_defined()?;
        self.ensure_defined()?;
        let mut accumulated = Intersection::empty();
        for object in other.objects()? {
            accumulated.extend(&self.intersection_with(object)?)?;
        }
        Ok(accumulated)
    }
}

impl Transformable for Composite {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if !transformation.prepare(self.is_defined(), "Composite")? {
            return Ok(());
        }
        for object in &mut self.objects {
            object.apply_transformation(transformation)?;
        }
        debug!(
            objects = self.objects.len(),
            kind = ?transformation.kind(),
            "composite transformed"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::d3::{IntersectionKind, Plane, Segment, Sphere};
    use crate::math::{Point3, Vector3};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn planes() -> Composite {
        Composite::new(vec![
            Plane::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap().into(),
            Plane::new(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap().into(),
        ])
    }

    #[test]
    fn undefined_composite_rejects_access() {
        let undefined = Composite::undefined();
        assert!(!undefined.is_defined());
        assert!(undefined.is_empty().is_err());
        assert!(undefined.object_count().is_err());
        assert!(undefined.object_at(0).is_err());
        assert_ne!(undefined.clone(), undefined);
        assert!(!Composite::from_object(Sphere::undefined()).is_defined());
    }

    #[test]
    fn indexed_access() {
        let composite = planes();
        assert_eq!(composite.object_count().unwrap(), 2);
        assert!(matches!(composite.object_at(1).unwrap(), Object::Plane(_)));
        assert!(composite.object_at(2).is_err());
        assert!(Composite::empty().is_empty().unwrap());
    }

    #[test]
    fn concatenation_keeps_order() {
        let a = Composite::from_object(p(0.0, 0.0, 0.0));
        let b: Composite = [p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)].into_iter().collect();
        let joined = a.concatenated(&b).unwrap();
        let expected: Composite = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]
            .into_iter()
            .collect();
        assert_eq!(joined, expected);
        assert!(a.concatenated(&Composite::undefined()).is_err());
    }

    #[test]
    fn containment_is_conjunctive() {
        let composite = planes();
        let on_both: Object = p(0.0, 5.0, 0.0).into();
        let on_one: Object = p(1.0, 5.0, 0.0).into();
        assert!(composite.contains(&on_both).unwrap());
        assert!(!composite.contains(&on_one).unwrap());
        assert!(composite.contains_any(&on_one).unwrap());
        assert!(Composite::empty().contains(&on_both).unwrap());
        assert!(!Composite::empty().contains_any(&on_both).unwrap());

        let points: Composite = [p(0.0, 1.0, 0.0), p(0.0, 2.0, 0.0)].into_iter().collect();
        assert!(composite.contains(&points).unwrap());
        assert!(composite.contains(&Composite::empty()).unwrap());
    }

    #[test]
    fn undefined_arguments_are_rejected() {
        let undefined: Object = Segment::undefined().into();
        let empty = Composite::empty();
        assert!(empty.intersects(&undefined).is_err());
        assert!(empty.contains(&undefined).is_err());
        assert!(empty.contains_any(&undefined).is_err());
        assert!(empty.intersection_with(&undefined).is_err());

        let composite = planes();
        assert!(composite.intersects(&Composite::undefined()).is_err());
        assert!(composite.contains(&Composite::undefined()).is_err());
        assert!(composite.intersection_with(&Composite::undefined()).is_err());
    }

    #[test]
    fn intersects_any_member() {
        let composite = planes();
        let above: Object = Segment::new(p(2.0, 1.0, 1.0), p(3.0, 1.0, 2.0)).into();
        let crossing: Object = Segment::new(p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)).into();
        assert!(!composite.intersects(&above).unwrap());
        assert!(composite.intersects(&crossing).unwrap());

        let other = Composite::new(vec![above, crossing]);
        assert!(composite.intersects(&other).unwrap());
    }

    #[test]
    fn intersection_accumulates_member_results() {
        let composite = planes();
        let diagonal: Object = Segment::new(p(-1.0, 0.0, -1.0), p(1.0, 0.0, 1.0)).into();
        let hit = composite.intersection_with(&diagonal).unwrap();
        assert_eq!(hit.kind(), IntersectionKind::Point);
        assert_eq!(hit.objects().len(), 2);

        let far: Object = Segment::new(p(2.0, 0.0, 1.0), p(3.0, 0.0, 1.0)).into();
        assert!(composite.intersection_with(&far).unwrap().is_empty());
    }

    #[test]
    fn transformation_applies_to_every_member() {
        let mut composite = planes();
        composite
            .apply_transformation(&Transformation::translation(&v(1.0, 0.0, 1.0)).unwrap())
            .unwrap();
        let moved: Object = p(1.0, 7.0, 1.0).into();
        assert!(composite.contains(&moved).unwrap());
        assert!(composite
            .apply_transformation(&Transformation::undefined())
            .is_err());
    }
}
