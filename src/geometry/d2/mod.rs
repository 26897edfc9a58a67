mod line;
mod line_string;
mod multi_polygon;
mod point_set;
mod polygon;
mod segment;
mod transformation;

pub use line::Line;
pub use line_string::LineString;
pub use multi_polygon::MultiPolygon;
pub use point_set::PointSet;
pub use polygon::Polygon;
pub use segment::Segment;
pub use transformation::{Transformable, Transformation};
