use tracing::trace;

use super::assemble::assemble_result;
use super::edge_source::EdgeSourceBuilder;
use super::labeller::OverlayLabeller;
use super::line_builder::LineBuilder;
use super::point_builder::intersection_points;
use super::points::overlay_points;
use super::polygon_builder::PolygonBuilder;
use super::robust::Strategy;
use super::select::{result_dimension, OverlayOp};
use crate::error::Result;
use crate::geometry::{Dimension, Envelope, Geometry};
use crate::math::precision::PrecisionModel;
use crate::noding::{validate_noding, IntersectionNoder, Noder, SnapRoundingNoder, SnappingNoder};
use crate::topology::{EdgeMerger, OverlayGraph};

/// Fraction of the clip box's smaller side added around it.
const SAFE_ENV_BUFFER_FACTOR: f64 = 0.1;

/// Grid cells added around the clip box under fixed precision.
const SAFE_ENV_GRID_FACTOR: f64 = 3.0;

/// Runs one overlay attempt under `strategy`.
///
/// The pipeline is: read and clip the input boundaries, node them, merge
/// coincident segments into edges, build and label the graph, then
/// extract polygons, lines and (for intersections) isolated points.
/// The graph lives only for the duration of the call.
///
/// # Errors
///
/// Returns a topology error if the noding or labelling is inconsistent,
/// or a geometry error for degenerate input.
pub fn run(a: &Geometry, b: &Geometry, op: OverlayOp, strategy: Strategy, clip: bool) -> Result<Geometry> {
    let precision = strategy.precision();
    if a.dimension() == Dimension::Point || b.dimension() == Dimension::Point {
        return Ok(overlay_points(a, b, op, precision));
    }

    let clip_env = if clip { clip_envelope(a, b, op, precision) } else { None };
    let mut source = EdgeSourceBuilder::new(clip_env);
    source.add(a, 0)?;
    source.add(b, 1)?;
    let strings = source.into_strings();
    let segments: usize = strings.iter().map(|s| s.num_segments()).sum();

    let noder: Box<dyn Noder> = match strategy {
        Strategy::Direct => Box::new(IntersectionNoder::new()),
        Strategy::Snapped { tolerance } => Box::new(SnappingNoder::new(tolerance)),
        Strategy::ReducedPrecision { .. } => Box::new(SnapRoundingNoder::new(precision)),
    };
    let noded = noder.node(strings)?;
    if strategy.validates_noding() {
        validate_noding(&noded)?;
    }

    let mut merger = EdgeMerger::new();
    merger.add_strings(&noded)?;
    trace!(%strategy, segments, edges = merger.len(), "inputs noded");
    let mut graph = OverlayGraph::build(merger.into_edges())?;
    trace!(half_edges = graph.half_edge_count(), nodes = graph.nodes().len(), "graph built");

    let mut labeller = OverlayLabeller::new(&mut graph, a, b);
    labeller.compute_labelling()?;
    labeller.mark_result_area(op)?;

    let polygons = PolygonBuilder::new(&graph).build()?;
    let lines = LineBuilder::new(&mut graph, op, [a.dimension(), b.dimension()]).build()?;
    let points = if op == OverlayOp::Intersection {
        intersection_points(&graph)?
    } else {
        Vec::new()
    };

    Ok(assemble_result(
        polygons,
        lines,
        points,
        result_dimension(op, a.dimension(), b.dimension()),
    ))
}

/// Box outside of which input edges cannot affect the result, or `None`
/// if the operation needs all of both inputs.
fn clip_envelope(a: &Geometry, b: &Geometry, op: OverlayOp, precision: PrecisionModel) -> Option<Envelope> {
    let env = match op {
        OverlayOp::Intersection => a.envelope().intersection(&b.envelope()),
        OverlayOp::Difference => a.envelope(),
        OverlayOp::Union | OverlayOp::SymDifference => return None,
    };
    if env.is_empty() {
        return None;
    }
    let margin = if precision.is_floating() {
        let min_side = env.width().min(env.height());
        let side = if min_side > 0.0 {
            min_side
        } else {
            env.width().max(env.height())
        };
        SAFE_ENV_BUFFER_FACTOR * side
    } else {
        SAFE_ENV_GRID_FACTOR * precision.grid_size()
    };
    // A degenerate box would clip away areas that only touch it.
    (margin > 0.0).then(|| env.expanded_by(margin))
}
