use geo::{Area, BooleanOps, ConvexHull, Intersects};

use super::{Polygon, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::math::{Defined, Point2};

/// A collection of disjoint polygons, produced by boolean operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
}

impl MultiPolygon {
    #[must_use]
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }

    /// # Errors
    ///
    /// Returns an error if the point or any part is undefined.
    pub fn contains(&self, point: &Point2) -> Result<bool> {
        self.ensure_defined()?;
        if !point.is_defined() {
            return Err(GeometryError::Undefined("Point").into());
        }
        Ok(self.to_geo().intersects(&geo::Point::new(point.x, point.y)))
    }

    /// # Errors
    ///
    /// Returns an error if the collection is empty or undefined.
    pub fn convex_hull(&self) -> Result<Polygon> {
        self.ensure_defined()?;
        if self.is_empty() {
            return Err(GeometryError::Degenerate("convex hull of an empty multi-polygon".into()).into());
        }
        Polygon::from_geo(&self.to_geo().convex_hull())
    }

    /// # Errors
    ///
    /// Returns an error if either side is undefined.
    pub fn union_with(&self, other: &MultiPolygon) -> Result<MultiPolygon> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        Self::from_geo(&self.to_geo().union(&other.to_geo()))
    }

    fn ensure_defined(&self) -> Result<()> {
        if self.is_defined() {
            Ok(())
        } else {
            Err(GeometryError::Undefined("MultiPolygon").into())
        }
    }

    pub(crate) fn to_geo(&self) -> geo::MultiPolygon<f64> {
        geo::MultiPolygon::new(self.polygons.iter().map(Polygon::to_geo).collect())
    }

    pub(crate) fn from_geo(multi: &geo::MultiPolygon<f64>) -> Result<Self> {
        let polygons = multi
            .iter()
            .map(Polygon::from_geo)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { polygons })
    }
}

impl Defined for MultiPolygon {
    fn is_defined(&self) -> bool {
        self.polygons.iter().all(Defined::is_defined)
    }
}

impl Transformable for MultiPolygon {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "MultiPolygon")? {
            for polygon in &mut self.polygons {
                polygon.apply_transformation(transformation)?;
            }
        }
        Ok(())
    }
}
