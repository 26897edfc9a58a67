use std::ops::Mul;

use nalgebra::{Rotation2, Vector3};

use crate::error::{GeometryError, Result, TransformationError};
use crate::geometry::d3::TransformationKind;
use crate::math::{Defined, Matrix3, Point2, Vector2};

const RIGIDITY_TOLERANCE: f64 = 1e-12;

/// A 3x3 homogeneous transformation of the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    kind: TransformationKind,
    matrix: Matrix3,
}

impl Transformation {
    /// # Errors
    ///
    /// Returns an error if the matrix contains NaN or infinite entries.
    pub fn from_matrix(matrix: Matrix3) -> Result<Self> {
        if !matrix.iter().all(|c| c.is_finite()) {
            return Err(TransformationError::Undefined.into());
        }
        let kind = if matrix == Matrix3::identity() {
            TransformationKind::Identity
        } else {
            TransformationKind::General
        };
        Ok(Self { kind, matrix })
    }

    #[must_use]
    pub fn undefined() -> Self {
        Self {
            kind: TransformationKind::Undefined,
            matrix: Matrix3::from_element(f64::NAN),
        }
    }

    #[must_use]
    pub fn identity() -> Self {
        Self {
            kind: TransformationKind::Identity,
            matrix: Matrix3::identity(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `offset` is undefined.
    pub fn translation(offset: &Vector2) -> Result<Self> {
        if !offset.is_defined() {
            return Err(GeometryError::Undefined("Vector").into());
        }
        Ok(Self {
            kind: TransformationKind::Translation,
            matrix: Matrix3::new_translation(offset),
        })
    }

    /// Counter-clockwise rotation about the origin by `angle` radians.
    ///
    /// # Errors
    ///
    /// Returns an error if `angle` is not finite.
    pub fn rotation(angle: f64) -> Result<Self> {
        if !angle.is_defined() {
            return Err(GeometryError::Undefined("Angle").into());
        }
        Ok(Self {
            kind: TransformationKind::Rotation,
            matrix: Rotation2::new(angle).to_homogeneous(),
        })
    }

    /// Rotation about `pivot`: `T(pivot) * R * T(-pivot)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pivot or the angle is undefined.
    pub fn rotation_around(pivot: &Point2, angle: f64) -> Result<Self> {
        if !pivot.is_defined() {
            return Err(GeometryError::Undefined("Point").into());
        }
        let to_origin = Self::translation(&(-pivot.coords))?;
        let back = Self::translation(&pivot.coords)?;
        let rotate = Self::rotation(angle)?;
        Ok(&(&back * &rotate) * &to_origin)
    }

    #[must_use]
    pub fn kind(&self) -> TransformationKind {
        self.kind
    }

    #[must_use]
    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.kind != TransformationKind::Undefined && self.matrix.iter().all(|c| c.is_finite())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.is_defined() && self.matrix == Matrix3::identity()
    }

    #[must_use]
    pub fn is_rigid(&self) -> bool {
        if !self.is_defined() {
            return false;
        }
        let bottom = self.matrix.fixed_view::<1, 3>(2, 0);
        if bottom[0] != 0.0 || bottom[1] != 0.0 || bottom[2] != 1.0 {
            return false;
        }
        let linear = self.matrix.fixed_view::<2, 2>(0, 0).into_owned();
        (linear.transpose() * linear - nalgebra::Matrix2::identity()).norm() < RIGIDITY_TOLERANCE
            && (linear.determinant() - 1.0).abs() < RIGIDITY_TOLERANCE
    }

    /// # Errors
    ///
    /// Returns an error if the transformation or the point is undefined.
    pub fn apply_to_point(&self, point: &Point2) -> Result<Point2> {
        self.ensure_defined()?;
        if !point.is_defined() {
            return Err(GeometryError::Undefined("Point").into());
        }
        let h = self.matrix * Vector3::new(point.x, point.y, 1.0);
        Ok(Point2::new(h.x, h.y))
    }

    /// # Errors
    ///
    /// Returns an error if the transformation or the vector is undefined.
    pub fn apply_to_vector(&self, vector: &Vector2) -> Result<Vector2> {
        self.ensure_defined()?;
        if !vector.is_defined() {
            return Err(GeometryError::Undefined("Vector").into());
        }
        let h = self.matrix * Vector3::new(vector.x, vector.y, 0.0);
        Ok(Vector2::new(h.x, h.y))
    }

    /// # Errors
    ///
    /// Returns an error if the transformation is undefined or singular.
    pub fn inverse(&self) -> Result<Self> {
        self.ensure_defined()?;
        let matrix = self
            .matrix
            .try_inverse()
            .ok_or(TransformationError::Singular)?;
        Ok(Self {
            kind: self.kind,
            matrix,
        })
    }

    /// # Errors
    ///
    /// Returns [`TransformationError::Undefined`].
    pub fn ensure_defined(&self) -> Result<()> {
        if self.is_defined() {
            Ok(())
        } else {
            Err(TransformationError::Undefined.into())
        }
    }

    pub(crate) fn prepare(&self, target_defined: bool, target: &'static str) -> Result<bool> {
        self.ensure_defined()?;
        if !target_defined {
            return Err(GeometryError::Undefined(target).into());
        }
        Ok(!self.is_identity())
    }
}

/// Composition; the right operand is applied first.
impl Mul for &Transformation {
    type Output = Transformation;

    fn mul(self, rhs: &Transformation) -> Transformation {
        use TransformationKind as K;

        if !self.is_defined() || !rhs.is_defined() {
            return Transformation::undefined();
        }
        let kind = match (self.kind, rhs.kind) {
            (K::Identity, other) | (other, K::Identity) => other,
            (K::Translation, K::Translation) => K::Translation,
            (K::Rotation, K::Rotation) => K::Rotation,
            _ => K::General,
        };
        Transformation {
            kind,
            matrix: self.matrix * rhs.matrix,
        }
    }
}

/// Planar shapes that can be moved in place by a [`Transformation`].
pub trait Transformable {
    /// # Errors
    ///
    /// Returns an error if the receiver or the transformation is undefined.
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()>;
}

impl Transformable for Point2 {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Point")? {
            *self = transformation.apply_to_point(self)?;
        }
        Ok(())
    }
}

/// Moves every point of a buffer.
pub(super) fn transform_points(
    points: &mut [Point2],
    transformation: &Transformation,
) -> Result<()> {
    for point in points {
        *point = transformation.apply_to_point(point)?;
    }
    Ok(())
}
