pub mod edge;
pub mod graph;
pub mod half_edge;
pub mod label;

pub use edge::{Edge, EdgeMerger};
pub use graph::OverlayGraph;
pub use half_edge::{HalfEdge, HalfEdgeId};
pub use label::{EdgeRole, GeometryLabel, OverlayLabel, Side};
