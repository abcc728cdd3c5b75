use crate::geometry::{Coordinate, Dimension, Geometry, LineString, Polygon};

/// Assembles the result from its polygonal, linear and point parts.
///
/// A result with parts of a single dimension is returned as the simplest
/// geometry of that kind; mixed results become a geometry collection
/// ordered by dimension, highest first. An empty result is the empty
/// geometry of `empty_dimension`.
#[must_use]
pub fn assemble_result(
    polygons: Vec<Polygon>,
    lines: Vec<LineString>,
    points: Vec<Coordinate>,
    empty_dimension: Dimension,
) -> Geometry {
    let mut parts = Vec::new();
    if !polygons.is_empty() {
        parts.push(Geometry::from_polygons(polygons));
    }
    if !lines.is_empty() {
        parts.push(Geometry::from_lines(lines));
    }
    if !points.is_empty() {
        parts.push(Geometry::from_points(points));
    }
    match parts.len() {
        0 => Geometry::empty(empty_dimension),
        1 => parts.remove(0),
        _ => Geometry::GeometryCollection(parts),
    }
}
