use geo::{Area, BooleanOps, ConvexHull, Coord, Intersects};

use super::transformation::transform_points;
use super::{MultiPolygon, Segment, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::math::{is_near_2d, Defined, Point2};

/// A planar polygon: one outer ring and zero or more holes.
///
/// Rings are stored open (the first vertex is not repeated at the end).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    outer_ring: Vec<Point2>,
    inner_rings: Vec<Vec<Point2>>,
}

impl Polygon {
    /// Creates a polygon with holes.
    ///
    /// # Errors
    ///
    /// Returns an error if any ring has fewer than three vertices.
    pub fn new(outer_ring: Vec<Point2>, inner_rings: Vec<Vec<Point2>>) -> Result<Self> {
        let outer_ring = open_ring(outer_ring);
        if outer_ring.len() < 3 {
            return Err(GeometryError::InvalidArgument(format!(
                "polygon outer ring needs at least 3 vertices, got {}",
                outer_ring.len()
            ))
            .into());
        }
        let inner_rings: Vec<Vec<Point2>> = inner_rings.into_iter().map(open_ring).collect();
        if let Some(ring) = inner_rings.iter().find(|ring| ring.len() < 3) {
            return Err(GeometryError::InvalidArgument(format!(
                "polygon inner ring needs at least 3 vertices, got {}",
                ring.len()
            ))
            .into());
        }
        Ok(Self {
            outer_ring,
            inner_rings,
        })
    }

    /// Creates a polygon without holes.
    ///
    /// # Errors
    ///
    /// See [`Polygon::new`].
    pub fn simple(outer_ring: Vec<Point2>) -> Result<Self> {
        Self::new(outer_ring, Vec::new())
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            outer_ring: Vec::new(),
            inner_rings: Vec::new(),
        }
    }

    #[must_use]
    pub fn outer_ring(&self) -> &[Point2] {
        &self.outer_ring
    }

    #[must_use]
    pub fn inner_rings(&self) -> &[Vec<Point2>] {
        &self.inner_rings
    }

    /// Number of outer ring vertices, which is also the edge count.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.outer_ring.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.outer_ring.len()
    }

    /// Outer ring vertices followed by the vertices of every hole.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        self.outer_ring
            .iter()
            .chain(self.inner_rings.iter().flatten())
            .copied()
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error if `index` is past the outer ring.
    pub fn vertex_at(&self, index: usize) -> Result<Point2> {
        self.outer_ring
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds("vertex", index))
    }

    /// Edge from outer vertex `index` to the next one, wrapping around.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is past the outer ring.
    pub fn edge_at(&self, index: usize) -> Result<Segment> {
        let n = self.outer_ring.len();
        if index >= n {
            return Err(self.out_of_bounds("edge", index));
        }
        Ok(Segment::new(
            self.outer_ring[index],
            self.outer_ring[(index + 1) % n],
        ))
    }

    /// Edges of the outer ring.
    #[must_use]
    pub fn edges(&self) -> Vec<Segment> {
        ring_edges(&self.outer_ring)
    }

    /// Returns `true` if the vertices of both polygons match pairwise
    /// within `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon is undefined.
    pub fn is_near(&self, other: &Polygon, tolerance: f64) -> Result<bool> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        let ours = self.vertices();
        let theirs = other.vertices();
        Ok(self.inner_rings.len() == other.inner_rings.len()
            && ours.len() == theirs.len()
            && ours
                .iter()
                .zip(&theirs)
                .all(|(a, b)| is_near_2d(a, b, tolerance)))
    }

    /// Unsigned area, holes subtracted.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is undefined.
    pub fn area(&self) -> Result<f64> {
        self.ensure_defined()?;
        Ok(self.to_geo().unsigned_area())
    }

    /// Point-in-polygon test. Points on the boundary are contained.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon or the point is undefined.
    pub fn contains(&self, point: &Point2) -> Result<bool> {
        self.ensure_defined()?;
        if !point.is_defined() {
            return Err(GeometryError::Undefined("Point").into());
        }
        Ok(self.to_geo().intersects(&geo::Point::new(point.x, point.y)))
    }

    /// # Errors
    ///
    /// Returns an error if either polygon is undefined.
    pub fn intersects(&self, other: &Polygon) -> Result<bool> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        Ok(self.to_geo().intersects(&other.to_geo()))
    }

    /// Area shared by both polygons. Empty if they are disjoint.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon is undefined.
    pub fn intersection_with(&self, other: &Polygon) -> Result<MultiPolygon> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        MultiPolygon::from_geo(&self.to_geo().intersection(&other.to_geo()))
    }

    /// Area of `self` not covered by `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon is undefined.
    pub fn difference_with(&self, other: &Polygon) -> Result<MultiPolygon> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        MultiPolygon::from_geo(&self.to_geo().difference(&other.to_geo()))
    }

    /// Union of both polygons; more than one part when they are disjoint.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon is undefined.
    pub fn union_with(&self, other: &Polygon) -> Result<MultiPolygon> {
        self.ensure_defined()?;
        other.ensure_defined()?;
        MultiPolygon::from_geo(&self.to_geo().union(&other.to_geo()))
    }

    /// # Errors
    ///
    /// Returns an error if the polygon is undefined.
    pub fn convex_hull(&self) -> Result<Polygon> {
        self.ensure_defined()?;
        Self::from_geo(&self.to_geo().convex_hull())
    }

    pub(crate) fn ensure_defined(&self) -> Result<()> {
        if self.is_defined() {
            Ok(())
        } else {
            Err(GeometryError::Undefined("Polygon").into())
        }
    }

    pub(crate) fn to_geo(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(
            ring_to_geo(&self.outer_ring),
            self.inner_rings.iter().map(|r| ring_to_geo(r)).collect(),
        )
    }

    pub(crate) fn from_geo(polygon: &geo::Polygon<f64>) -> Result<Self> {
        Self::new(
            ring_from_geo(polygon.exterior()),
            polygon.interiors().iter().map(ring_from_geo).collect(),
        )
    }

    fn out_of_bounds(&self, what: &'static str, index: usize) -> crate::SightlineError {
        GeometryError::IndexOutOfBounds {
            what,
            index,
            len: self.outer_ring.len(),
        }
        .into()
    }
}

impl Defined for Polygon {
    fn is_defined(&self) -> bool {
        !self.outer_ring.is_empty()
            && self.outer_ring.iter().all(Defined::is_defined)
            && self.inner_rings.iter().flatten().all(Defined::is_defined)
    }
}

impl Transformable for Polygon {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Polygon")? {
            transform_points(&mut self.outer_ring, transformation)?;
            for ring in &mut self.inner_rings {
                transform_points(ring, transformation)?;
            }
        }
        Ok(())
    }
}

fn ring_edges(ring: &[Point2]) -> Vec<Segment> {
    let n = ring.len();
    (0..n)
        .map(|i| Segment::new(ring[i], ring[(i + 1) % n]))
        .collect()
}

/// Drops a trailing vertex that repeats the first one.
fn open_ring(mut ring: Vec<Point2>) -> Vec<Point2> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn ring_to_geo(ring: &[Point2]) -> geo::LineString<f64> {
    geo::LineString::new(ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

fn ring_from_geo(ring: &geo::LineString<f64>) -> Vec<Point2> {
    open_ring(ring.coords().map(|c| Point2::new(c.x, c.y)).collect())
}
