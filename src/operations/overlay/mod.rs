mod assemble;
mod clip;
mod edge_source;
mod engine;
mod labeller;
mod line_builder;
mod overlay_op;
mod point_builder;
mod points;
mod policy;
mod polygon_builder;
mod robust;
mod select;
mod unary_union;

pub use clip::{LineLimiter, RingClipper};
pub use overlay_op::{overlay, Overlay};
pub use policy::RobustnessPolicy;
pub use robust::{Attempt, AttemptOutcome, LadderState, OverlayReport, RobustnessLadder, Strategy};
pub use select::{is_result_of_op, result_dimension, OverlayOp};
pub use unary_union::{union, UnaryUnion};
