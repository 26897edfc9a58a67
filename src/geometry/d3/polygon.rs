use super::{ensure_defined, Contains, Intersects, Plane, Segment, Transformable, Transformation};
use crate::error::{GeometryError, Result};
use crate::geometry::d2;
use crate::math::{is_near, undefined_point, undefined_vector, Defined, Point2, Point3, Vector3, EPSILON};

/// A planar polygon embedded in 3D.
///
/// Vertices are stored as 2D coordinates in the frame spanned by `x_axis`
/// and `y_axis` at `origin`.
#[derive(Debug, Clone)]
pub struct Polygon {
    polygon: d2::Polygon,
    origin: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
}

impl Polygon {
    /// Creates a polygon in the plane spanned by `x_axis` and `y_axis`.
    ///
    /// Axes of any non-zero length are accepted and stored normalized, so
    /// local coordinates are always measured in world units. Orthogonality
    /// is checked on the normalized axes within [`EPSILON`].
    ///
    /// # Errors
    ///
    /// Returns an error if an axis has zero length or the axes are not
    /// orthogonal.
    pub fn new(polygon: d2::Polygon, origin: Point3, x_axis: Vector3, y_axis: Vector3) -> Result<Self> {
        let (x_len, y_len) = (x_axis.norm(), y_axis.norm());
        if x_len == 0.0 || y_len == 0.0 {
            return Err(GeometryError::ZeroVector.into());
        }
        let x_axis = x_axis / x_len;
        let y_axis = y_axis / y_len;
        if x_axis.dot(&y_axis).abs() > EPSILON {
            return Err(GeometryError::InvalidArgument(format!(
                "polygon axes {x_axis:?} and {y_axis:?} are not orthogonal"
            ))
            .into());
        }
        Ok(Self {
            polygon,
            origin,
            x_axis,
            y_axis,
        })
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            polygon: d2::Polygon::undefined(),
            origin: undefined_point(),
            x_axis: undefined_vector(),
            y_axis: undefined_vector(),
        }
    }

    #[must_use]
    pub fn polygon2d(&self) -> &d2::Polygon {
        &self.polygon
    }

    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    #[must_use]
    pub fn x_axis(&self) -> &Vector3 {
        &self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> &Vector3 {
        &self.y_axis
    }

    /// `x_axis × y_axis`.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.x_axis.cross(&self.y_axis)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.polygon.vertex_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.polygon.edge_count()
    }

    /// # Errors
    ///
    /// Returns an error if `index` is past the outer ring.
    pub fn vertex_at(&self, index: usize) -> Result<Point3> {
        Ok(self.to_world(&self.polygon.vertex_at(index)?))
    }

    /// # Errors
    ///
    /// Returns an error if `index` is past the outer ring.
    pub fn edge_at(&self, index: usize) -> Result<Segment> {
        let edge = self.polygon.edge_at(index)?;
        Ok(Segment::new(
            self.to_world(edge.first()),
            self.to_world(edge.second()),
        ))
    }

    /// Outer ring vertices followed by hole vertices.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point3> {
        self.polygon
            .vertices()
            .iter()
            .map(|vertex| self.to_world(vertex))
            .collect()
    }

    #[must_use]
    pub fn edges(&self) -> Vec<Segment> {
        self.polygon
            .edges()
            .iter()
            .map(|edge| Segment::new(self.to_world(edge.first()), self.to_world(edge.second())))
            .collect()
    }

    /// Vertex-wise comparison in world coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon is undefined.
    pub fn is_near(&self, other: &Polygon, tolerance: f64) -> Result<bool> {
        ensure_defined(self.is_defined(), "Polygon")?;
        ensure_defined(other.is_defined(), "Polygon")?;
        let ours = self.vertices();
        let theirs = other.vertices();
        Ok(ours.len() == theirs.len()
            && ours
                .iter()
                .zip(&theirs)
                .all(|(a, b)| is_near(a, b, tolerance)))
    }

    /// Supporting plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon is undefined.
    pub fn to_plane(&self) -> Result<Plane> {
        ensure_defined(self.is_defined(), "Polygon")?;
        Plane::new(self.origin, self.normal())
    }

    /// Coordinates of `point` in the polygon frame, ignoring the normal
    /// component.
    pub(crate) fn to_local(&self, point: &Point3) -> Point2 {
        let offset = point - self.origin;
        Point2::new(offset.dot(&self.x_axis), offset.dot(&self.y_axis))
    }

    pub(crate) fn to_world(&self, point: &Point2) -> Point3 {
        self.origin + self.x_axis * point.x + self.y_axis * point.y
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.is_defined()
            && other.is_defined()
            && self.polygon == other.polygon
            && self.origin == other.origin
            && self.x_axis == other.x_axis
            && self.y_axis == other.y_axis
    }
}

impl Defined for Polygon {
    fn is_defined(&self) -> bool {
        self.polygon.is_defined()
            && self.origin.is_defined()
            && self.x_axis.is_defined()
            && self.y_axis.is_defined()
    }
}

impl Contains<Point3> for Polygon {
    /// Boundary-inclusive; the point must lie exactly in the polygon plane.
    fn contains(&self, point: &Point3) -> Result<bool> {
        ensure_defined(self.is_defined(), "Polygon")?;
        ensure_defined(point.is_defined(), "Point")?;
        if (point - self.origin).dot(&self.normal()) != 0.0 {
            return Ok(false);
        }
        self.polygon.contains(&self.to_local(point))
    }
}

impl Intersects<Point3> for Polygon {
    fn intersects(&self, point: &Point3) -> Result<bool> {
        self.contains(point)
    }
}

impl Transformable for Polygon {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Polygon")? {
            let origin = transformation.apply_to_point(&self.origin)?;
            let x_axis = transformation.apply_to_vector(&self.x_axis)?;
            let y_axis = transformation.apply_to_vector(&self.y_axis)?;
            *self = Self::new(self.polygon.clone(), origin, x_axis, y_axis)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::UnitQuaternion;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn unit_square() -> d2::Polygon {
        d2::Polygon::simple(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .unwrap()
    }

    fn raised_square() -> Polygon {
        Polygon::new(unit_square(), p(0.0, 0.0, 2.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)).unwrap()
    }

    #[test]
    fn axes_must_be_orthogonal_and_non_zero() {
        let square = unit_square();
        assert!(Polygon::new(square.clone(), p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(1.0, 1.0, 0.0)).is_err());
        assert!(Polygon::new(square, p(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0)).is_err());
    }

    #[test]
    fn scaled_axes_are_normalized() {
        let stretched =
            Polygon::new(unit_square(), p(0.0, 0.0, 0.0), v(3.0, 0.0, 0.0), v(0.0, 0.5, 0.0)).unwrap();
        assert_eq!(*stretched.x_axis(), v(1.0, 0.0, 0.0));
        assert_eq!(*stretched.y_axis(), v(0.0, 1.0, 0.0));
        assert_eq!(stretched.vertex_at(2).unwrap(), p(1.0, 1.0, 0.0));
    }

    #[test]
    fn vertices_and_edges_in_world_frame() {
        let polygon = raised_square();
        assert_eq!(polygon.vertex_count(), 4);
        assert_eq!(polygon.vertex_at(2).unwrap(), p(1.0, 1.0, 2.0));
        assert_eq!(
            polygon.edge_at(3).unwrap(),
            Segment::new(p(0.0, 1.0, 2.0), p(0.0, 0.0, 2.0))
        );
        assert_eq!(polygon.edges().len(), 4);
        assert!(polygon.edge_at(4).is_err());
        assert_eq!(polygon.normal(), v(0.0, 0.0, 1.0));
    }

    #[test]
    fn contains_points_in_plane_only() {
        let polygon = raised_square();
        assert!(polygon.contains(&p(0.5, 0.5, 2.0)).unwrap());
        assert!(polygon.contains(&p(1.0, 0.5, 2.0)).unwrap());
        assert!(!polygon.contains(&p(0.5, 0.5, 2.5)).unwrap());
        assert!(!polygon.contains(&p(1.5, 0.5, 2.0)).unwrap());
    }

    #[test]
    fn supporting_plane() {
        let plane = raised_square().to_plane().unwrap();
        assert_eq!(plane, Plane::new(p(5.0, 5.0, 2.0), v(0.0, 0.0, -1.0)).unwrap());
    }

    #[test]
    fn rotation_moves_frame() {
        let mut polygon = raised_square();
        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI);
        polygon
            .apply_transformation(&Transformation::rotation(&q).unwrap())
            .unwrap();
        assert_relative_eq!(*polygon.origin(), p(0.0, 0.0, -2.0), epsilon = 1e-12);
        assert_relative_eq!(polygon.normal(), v(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert!(polygon.is_near(&polygon.clone(), 0.0).unwrap());
    }

    #[test]
    fn translation_round_trip() {
        let original = raised_square();
        let mut polygon = original.clone();
        let offset = v(0.5, -1.0, 3.0);
        polygon
            .apply_transformation(&Transformation::translation(&offset).unwrap())
            .unwrap();
        polygon
            .apply_transformation(&Transformation::translation(&-offset).unwrap())
            .unwrap();
        assert!(polygon.is_near(&original, 1e-12).unwrap());
    }

    #[test]
    fn undefined_polygon_is_rejected() {
        assert!(!Polygon::undefined().is_defined());
        assert!(Polygon::undefined().contains(&p(0.0, 0.0, 0.0)).is_err());
        assert!(Polygon::undefined().to_plane().is_err());
    }
}
