use thiserror::Error;

/// Top-level error type for the sightline geometry library.
#[derive(Debug, Error)]
pub enum SightlineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Intersection(#[from] IntersectionError),

    #[error(transparent)]
    Transformation(#[from] TransformationError),
}

/// Errors raised by geometric primitives and the pairwise algorithms.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// An operation was invoked on an operand that is not defined.
    #[error("{0} is undefined")]
    Undefined(&'static str),

    /// Construction input is structurally invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("{what} index {index} out of bounds [0, {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// The dispatch table has no algorithm for this pair of shapes.
    #[error("{operation} is not implemented between {lhs} and {rhs}")]
    Unsupported {
        operation: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
}

/// Errors raised when narrowing an [`Intersection`](crate::geometry::d3::Intersection).
#[derive(Debug, Error)]
pub enum IntersectionError {
    #[error("intersection is undefined")]
    Undefined,

    #[error("cannot convert intersection: it is empty")]
    Empty,

    #[error("cannot convert intersection to {expected}: wrong type {actual}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors related to transformations.
#[derive(Debug, Error)]
pub enum TransformationError {
    #[error("transformation is undefined")]
    Undefined,

    #[error("transformation is not rigid")]
    NotRigid,

    #[error("transformation matrix is singular")]
    Singular,
}

/// Convenience type alias for results using [`SightlineError`].
pub type Result<T> = std::result::Result<T, SightlineError>;
