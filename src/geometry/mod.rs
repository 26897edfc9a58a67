pub mod d2;
pub mod d3;

pub use d3::{
    Composite, Contains, Intersection, IntersectionKind, IntersectionParams, IntersectionWith,
    Intersects, Object, Transformable, Transformation,
};
