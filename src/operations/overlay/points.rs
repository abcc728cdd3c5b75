use std::collections::HashSet;

use super::assemble::assemble_result;
use super::select::OverlayOp;
use crate::geometry::{CoordKey, Coordinate, Dimension, Geometry, Location, PointLocator};
use crate::math::precision::PrecisionModel;

/// Overlay where at least one input is puntal. No graph is built: point
/// sets are combined on exact coordinates and points are located against
/// the other input.
#[must_use]
pub fn overlay_points(a: &Geometry, b: &Geometry, op: OverlayOp, precision: PrecisionModel) -> Geometry {
    let puntal = |g: &Geometry| g.dimension() == Dimension::Point;
    match (puntal(a), puntal(b)) {
        (true, true) => overlay_point_sets(a, b, op, precision),
        (true, false) => overlay_mixed(a, b, op, precision, true),
        (false, _) => overlay_mixed(b, a, op, precision, false),
    }
}

fn distinct_points(g: &Geometry, precision: PrecisionModel) -> Vec<Coordinate> {
    let mut seen = HashSet::new();
    g.points()
        .into_iter()
        .map(|c| precision.make_precise_coord(c))
        .filter(|c| seen.insert(c.key()))
        .collect()
}

fn overlay_point_sets(a: &Geometry, b: &Geometry, op: OverlayOp, precision: PrecisionModel) -> Geometry {
    let pa = distinct_points(a, precision);
    let pb = distinct_points(b, precision);
    let ka: HashSet<CoordKey> = pa.iter().map(Coordinate::key).collect();
    let kb: HashSet<CoordKey> = pb.iter().map(Coordinate::key).collect();
    let a_not_b = pa.iter().filter(|c| !kb.contains(&c.key())).copied();
    let b_not_a = pb.iter().filter(|c| !ka.contains(&c.key())).copied();
    let points: Vec<Coordinate> = match op {
        OverlayOp::Intersection => pa.iter().filter(|c| kb.contains(&c.key())).copied().collect(),
        OverlayOp::Union => pa.iter().copied().chain(b_not_a).collect(),
        OverlayOp::Difference => a_not_b.collect(),
        OverlayOp::SymDifference => a_not_b.chain(b_not_a).collect(),
    };
    Geometry::from_points(points)
}

/// `points` is the puntal input, `other` the lineal or polygonal one;
/// `points_first` tells whether the points are input A.
fn overlay_mixed(
    points: &Geometry,
    other: &Geometry,
    op: OverlayOp,
    precision: PrecisionModel,
    points_first: bool,
) -> Geometry {
    let locator = PointLocator::new();
    let coords = distinct_points(points, precision);
    let (inside, outside): (Vec<Coordinate>, Vec<Coordinate>) = coords
        .into_iter()
        .partition(|c| locator.locate(c, other) != Location::Exterior);
    let with_other = |extra: Vec<Coordinate>| {
        assemble_result(
            other.polygons().into_iter().cloned().collect(),
            other.line_strings().into_iter().cloned().collect(),
            extra,
            other.dimension(),
        )
    };
    match op {
        OverlayOp::Intersection => Geometry::from_points(inside),
        OverlayOp::Union | OverlayOp::SymDifference => with_other(outside),
        OverlayOp::Difference if points_first => Geometry::from_points(outside),
        OverlayOp::Difference => with_other(Vec::new()),
    }
}
