use crate::error::Result;
use crate::geometry::Coordinate;
use crate::topology::OverlayGraph;

/// Nodes where the inputs meet without any result edge: the isolated
/// points of an intersection, such as areas touching at a vertex or lines
/// crossing.
///
/// # Errors
///
/// Returns [`crate::error::TopologyError::EntityNotFound`] for a stale
/// half-edge.
pub fn intersection_points(graph: &OverlayGraph) -> Result<Vec<Coordinate>> {
    let mut points = Vec::new();
    'nodes: for &node in graph.nodes() {
        let mut edge_of = [false; 2];
        for e in graph.rotation(node)? {
            let he = graph.half_edge(e)?;
            if he.is_in_result() || graph.half_edge(he.sym)?.is_in_result() {
                continue 'nodes;
            }
            let label = graph.label(e)?;
            edge_of[0] |= label.is_edge_of(0);
            edge_of[1] |= label.is_edge_of(1);
        }
        if edge_of[0] && edge_of[1] {
            points.push(graph.origin(node)?);
        }
    }
    Ok(points)
}
