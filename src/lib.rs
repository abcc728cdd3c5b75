pub mod error;
pub mod geometry;
pub mod index;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use error::{OverlayError, Result};
pub use geometry::{Coordinate, Dimension, Envelope, Geometry, LineString, LinearRing, Location, Point, Polygon};
pub use operations::overlay::{overlay, union, Overlay, OverlayOp, RobustnessPolicy, UnaryUnion};
