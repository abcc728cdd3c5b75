use crate::geometry::Coordinate;

slotmap::new_key_type! {
    /// Unique identifier for a half-edge in an overlay graph.
    pub struct HalfEdgeId;
}

/// One direction of a graph edge.
///
/// `sym` is the opposite half-edge. `next` and `prev` link the rotation
/// ring of half-edges leaving the same origin, in counter-clockwise and
/// clockwise order respectively.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub origin: Coordinate,
    pub dest: Coordinate,
    pub sym: HalfEdgeId,
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    /// Index of the origin node.
    pub node: usize,
    /// Index of the undirected edge, which owns the label.
    pub edge: usize,
    /// `true` if this half-edge runs in the direction the label is stored in.
    pub forward: bool,
    pub in_result_area: bool,
    pub in_result_line: bool,
}

impl HalfEdge {
    pub(crate) fn new(origin: Coordinate, dest: Coordinate, edge: usize, forward: bool) -> Self {
        Self {
            origin,
            dest,
            sym: HalfEdgeId::default(),
            next: HalfEdgeId::default(),
            prev: HalfEdgeId::default(),
            node: 0,
            edge,
            forward,
            in_result_area: false,
            in_result_line: false,
        }
    }

    /// Returns `true` if the half-edge is part of the result.
    #[must_use]
    pub fn is_in_result(&self) -> bool {
        self.in_result_area || self.in_result_line
    }
}
