use std::ops::Mul;

use nalgebra::Vector4;

use crate::error::{GeometryError, Result, TransformationError};
use crate::math::{Defined, Matrix3, Matrix4, Point3, UnitQuaternion, Vector3};

/// Deviation from orthonormality tolerated by [`Transformation::is_rigid`].
const RIGIDITY_TOLERANCE: f64 = 1e-12;

/// Classification of a [`Transformation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformationKind {
    Undefined,
    Identity,
    Translation,
    Rotation,
    General,
}

/// A 4x4 homogeneous transformation applied to points (`w = 1`) and
/// vectors (`w = 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    kind: TransformationKind,
    matrix: Matrix4,
}

impl Transformation {
    /// Creates a transformation from an arbitrary homogeneous matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix contains NaN or infinite entries.
    pub fn from_matrix(matrix: Matrix4) -> Result<Self> {
        if !matrix.iter().all(|c| c.is_finite()) {
            return Err(TransformationError::Undefined.into());
        }
        let kind = if matrix == Matrix4::identity() {
            TransformationKind::Identity
        } else {
            TransformationKind::General
        };
        Ok(Self { kind, matrix })
    }

    /// The undefined transformation. Every application fails.
    #[must_use]
    pub fn undefined() -> Self {
        Self {
            kind: TransformationKind::Undefined,
            matrix: Matrix4::from_element(f64::NAN),
        }
    }

    #[must_use]
    pub fn identity() -> Self {
        Self {
            kind: TransformationKind::Identity,
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is undefined.
    pub fn translation(offset: &Vector3) -> Result<Self> {
        if !offset.is_defined() {
            return Err(GeometryError::Undefined("Vector").into());
        }
        Ok(Self {
            kind: TransformationKind::Translation,
            matrix: Matrix4::new_translation(offset),
        })
    }

    /// Active rotation about the origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `rotation` is undefined.
    pub fn rotation(rotation: &UnitQuaternion) -> Result<Self> {
        if !rotation.is_defined() {
            return Err(GeometryError::Undefined("Quaternion").into());
        }
        Ok(Self {
            kind: TransformationKind::Rotation,
            matrix: rotation.to_homogeneous(),
        })
    }

    /// Rotation about an arbitrary pivot: `T(pivot) * R * T(-pivot)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pivot or rotation is undefined.
    pub fn rotation_around(pivot: &Point3, rotation: &UnitQuaternion) -> Result<Self> {
        if !pivot.is_defined() {
            return Err(GeometryError::Undefined("Point").into());
        }
        let to_origin = Self::translation(&(-pivot.coords))?;
        let back = Self::translation(&pivot.coords)?;
        let rotate = Self::rotation(rotation)?;
        Ok(&(&back * &rotate) * &to_origin)
    }

    #[must_use]
    pub fn kind(&self) -> TransformationKind {
        self.kind
    }

    #[must_use]
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.kind != TransformationKind::Undefined && self.matrix.iter().all(|c| c.is_finite())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.is_defined() && self.matrix == Matrix4::identity()
    }

    /// Returns `true` if the transformation preserves distances and
    /// handedness.
    #[must_use]
    pub fn is_rigid(&self) -> bool {
        if !self.is_defined() {
            return false;
        }
        let bottom = self.matrix.fixed_view::<1, 4>(3, 0);
        if bottom[0] != 0.0 || bottom[1] != 0.0 || bottom[2] != 0.0 || bottom[3] != 1.0 {
            return false;
        }
        let linear = self.linear_part();
        (linear.transpose() * linear - Matrix3::identity()).norm() < RIGIDITY_TOLERANCE
            && (linear.determinant() - 1.0).abs() < RIGIDITY_TOLERANCE
    }

    /// Top-left 3x3 block.
    #[must_use]
    pub fn linear_part(&self) -> Matrix3 {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Transforms a position (homogeneous `w = 1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation or the point is undefined.
    pub fn apply_to_point(&self, point: &Point3) -> Result<Point3> {
        self.ensure_defined()?;
        if !point.is_defined() {
            return Err(GeometryError::Undefined("Point").into());
        }
        let v = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        Ok(Point3::new(v.x, v.y, v.z))
    }

    /// Transforms a free vector (homogeneous `w = 0`).
    ///
    /// # Errors
    ///
    /// Returns an error if the transformation or the vector is undefined.
    pub fn apply_to_vector(&self, vector: &Vector3) -> Result<Vector3> {
        self.ensure_defined()?;
        if !vector.is_defined() {
            return Err(GeometryError::Undefined("Vector").into());
        }
        let v = self.matrix * Vector4::new(vector.x, vector.y, vector.z, 0.0);
        Ok(Vector3::new(v.x, v.y, v.z))
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

    /// Fails if this transformation is undefined.
    ///
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

    /// Shared preamble of every `apply_transformation`: rejects undefined
    /// operands and reports whether there is any work to do.
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

/// Shapes that can be moved in place by a [`Transformation`].
pub trait Transformable {
    /// Applies `transformation` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver or the transformation is undefined,
    /// or if the shape cannot represent the transformed result.
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()>;
}

impl Transformable for Point3 {
    fn apply_transformation(&mut self, transformation: &Transformation) -> Result<()> {
        if transformation.prepare(self.is_defined(), "Point")? {
            *self = transformation.apply_to_point(self)?;
        }
        Ok(())
    }
}
