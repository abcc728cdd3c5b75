pub mod double_double;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod precision;
pub mod predicates;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;
