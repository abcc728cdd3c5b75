use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::trace;

use super::edge::Edge;
use super::half_edge::{HalfEdge, HalfEdgeId};
use super::label::{OverlayLabel, Side};
use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{CoordKey, Coordinate, Location};
use crate::math::predicates::compare_direction;

/// Directed planar subdivision built from noded, merged edges.
///
/// Half-edges live in an arena and refer to each other by id, so the
/// cyclic `sym`/`next` structure needs no shared ownership. The whole
/// graph is dropped at once when an overlay attempt ends.
#[derive(Debug, Default)]
pub struct OverlayGraph {
    half_edges: SlotMap<HalfEdgeId, HalfEdge>,
    labels: Vec<OverlayLabel>,
    /// One outgoing half-edge per node, in first-seen order.
    nodes: Vec<HalfEdgeId>,
}

impl OverlayGraph {
    /// Builds the graph: one half-edge pair per edge, with the half-edges
    /// leaving each node linked into a counter-clockwise rotation ring.
    ///
    /// Half-edges with the same direction are ordered by destination, so
    /// the ring order is total and deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLengthSegment`] for an edge whose
    /// endpoints coincide.
    pub fn build(edges: Vec<Edge>) -> Result<Self> {
        let mut graph = Self::default();
        let mut node_index: HashMap<CoordKey, usize> = HashMap::new();
        let mut node_edges: Vec<Vec<HalfEdgeId>> = Vec::new();

        for (i, edge) in edges.into_iter().enumerate() {
            if edge.orig.equals_2d(&edge.dest) {
                return Err(GeometryError::ZeroLengthSegment {
                    x: edge.orig.x,
                    y: edge.orig.y,
                }
                .into());
            }
            let fwd = graph.half_edges.insert(HalfEdge::new(edge.orig, edge.dest, i, true));
            let bwd = graph.half_edges.insert(HalfEdge::new(edge.dest, edge.orig, i, false));
            for (id, sym, at) in [(fwd, bwd, edge.orig), (bwd, fwd, edge.dest)] {
                let node = *node_index.entry(at.key()).or_insert_with(|| {
                    node_edges.push(Vec::new());
                    node_edges.len() - 1
                });
                node_edges[node].push(id);
                let he = graph.half_edge_mut(id)?;
                he.sym = sym;
                he.node = node;
            }
            graph.labels.push(edge.label);
        }

        for mut out in node_edges {
            graph.sort_rotation(&mut out)?;
            let n = out.len();
            for (k, &id) in out.iter().enumerate() {
                let he = graph.half_edge_mut(id)?;
                he.next = out[(k + 1) % n];
                he.prev = out[(k + n - 1) % n];
            }
            if let Some(&first) = out.first() {
                graph.nodes.push(first);
            }
        }
        trace!(
            edges = graph.labels.len(),
            nodes = graph.nodes.len(),
            "overlay graph built"
        );
        Ok(graph)
    }

    fn sort_rotation(&self, out: &mut [HalfEdgeId]) -> Result<()> {
        let mut keyed = Vec::with_capacity(out.len());
        for &id in out.iter() {
            let he = self.half_edge(id)?;
            keyed.push((id, he.origin.xy(), he.dest));
        }
        keyed.sort_by(|a, b| {
            compare_direction(&a.1, &a.2.xy(), &b.2.xy()).then_with(|| a.2.compare_2d(&b.2))
        });
        for (slot, (id, _, _)) in out.iter_mut().zip(keyed) {
            *slot = id;
        }
        Ok(())
    }

    /// Returns the half-edge, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn half_edge(&self, id: HalfEdgeId) -> Result<&HalfEdge> {
        self.half_edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge").into())
    }

    /// Returns the half-edge mutably, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn half_edge_mut(&mut self, id: HalfEdgeId) -> Result<&mut HalfEdge> {
        self.half_edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge").into())
    }

    /// All half-edge ids in creation order: each forward half-edge is
    /// immediately followed by its sym.
    pub fn half_edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.half_edges.keys()
    }

    /// One outgoing half-edge per node.
    #[must_use]
    pub fn nodes(&self) -> &[HalfEdgeId] {
        &self.nodes
    }

    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn sym(&self, id: HalfEdgeId) -> Result<HalfEdgeId> {
        Ok(self.half_edge(id)?.sym)
    }

    /// Next half-edge counter-clockwise around the origin.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn next(&self, id: HalfEdgeId) -> Result<HalfEdgeId> {
        Ok(self.half_edge(id)?.next)
    }

    /// Next half-edge clockwise around the origin.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn prev(&self, id: HalfEdgeId) -> Result<HalfEdgeId> {
        Ok(self.half_edge(id)?.prev)
    }

    /// The rotation ring starting at `start`, counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn rotation(&self, start: HalfEdgeId) -> Result<Vec<HalfEdgeId>> {
        let mut ring = vec![start];
        let mut e = self.next(start)?;
        while e != start {
            ring.push(e);
            e = self.next(e)?;
        }
        Ok(ring)
    }

    /// Label of the half-edge, oriented to its direction.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn label(&self, id: HalfEdgeId) -> Result<OverlayLabel> {
        let he = self.half_edge(id)?;
        let label = self.labels[he.edge];
        Ok(if he.forward { label } else { label.reversed() })
    }

    /// Sets the location of a side of the half-edge for input `geom`.
    /// The sym sees the same change with left and right exchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn set_location(&mut self, id: HalfEdgeId, geom: usize, side: Side, loc: Location) -> Result<()> {
        let (edge, forward) = {
            let he = self.half_edge(id)?;
            (he.edge, he.forward)
        };
        let stored_side = match (side, forward) {
            (Side::On, _) => Side::On,
            (s, true) => s,
            (Side::Left, false) => Side::Right,
            (Side::Right, false) => Side::Left,
        };
        let label = self.labels[edge].geom_mut(geom);
        match stored_side {
            Side::Left => label.left = Some(loc),
            Side::Right => label.right = Some(loc),
            Side::On => label.on = Some(loc),
        }
        Ok(())
    }

    /// Places a non-boundary edge wholly at `loc` for input `geom`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn set_edge_location(&mut self, id: HalfEdgeId, geom: usize, loc: Location) -> Result<()> {
        let edge = self.half_edge(id)?.edge;
        self.labels[edge].geom_mut(geom).set_location(loc);
        Ok(())
    }

    /// Origin coordinate of the half-edge.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale id.
    pub fn origin(&self, id: HalfEdgeId) -> Result<Coordinate> {
        Ok(self.half_edge(id)?.origin)
    }
}
