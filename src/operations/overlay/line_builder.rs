use slotmap::SecondaryMap;
use tracing::trace;

use super::select::{is_result_of_op, OverlayOp};
use crate::error::Result;
use crate::geometry::{Coordinate, Dimension, LineString, Location};
use crate::topology::{EdgeRole, GeometryLabel, HalfEdgeId, OverlayGraph, OverlayLabel, Side};

/// Selects the edges that enter the result as lines and chains them into
/// line strings.
///
/// An edge is a result line when the result area lies on neither side of
/// it and the operation keeps it on the effective locations of the edge:
/// line and collapse edges count as interior to their input, area
/// boundaries as boundary. Interior collapses and edges bounding only one
/// input's area are never lines. For an intersection, coincident
/// boundaries of areas lying on opposite sides are kept.
pub struct LineBuilder<'a> {
    graph: &'a mut OverlayGraph,
    op: OverlayOp,
    area: [bool; 2],
}

impl<'a> LineBuilder<'a> {
    #[must_use]
    pub fn new(graph: &'a mut OverlayGraph, op: OverlayOp, dims: [Dimension; 2]) -> Self {
        Self {
            graph,
            op,
            area: dims.map(|d| d == Dimension::Area),
        }
    }

    /// Marks the result lines and returns them as line strings.
    ///
    /// Lines are merged through nodes where exactly two result lines meet;
    /// a loop of such nodes becomes a closed line string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::TopologyError::EntityNotFound`] for a stale
    /// half-edge.
    pub fn build(mut self) -> Result<Vec<LineString>> {
        self.mark_result_lines()?;
        let lines = self.chain_lines()?;
        trace!(lines = lines.len(), "result lines built");
        Ok(lines)
    }

    fn mark_result_lines(&mut self) -> Result<()> {
        for e in self.graph.half_edge_ids().collect::<Vec<_>>() {
            let he = self.graph.half_edge(e)?;
            if !he.forward {
                continue;
            }
            let sym = he.sym;
            let label = self.graph.label(e)?;
            if self.is_result_line(&label) {
                self.graph.half_edge_mut(e)?.in_result_line = true;
                self.graph.half_edge_mut(sym)?.in_result_line = true;
            }
        }
        Ok(())
    }

    fn is_result_line(&self, label: &OverlayLabel) -> bool {
        if self.has_area_on(label, Side::Right) || self.has_area_on(label, Side::Left) {
            return false;
        }
        let (a, b) = (label.geom(0), label.geom(1));
        if is_interior_collapse(a) || is_interior_collapse(b) {
            return false;
        }
        if label.is_boundary_both() {
            return self.op == OverlayOp::Intersection;
        }
        if (a.is_boundary() && b.role == EdgeRole::NotPart) || (b.is_boundary() && a.role == EdgeRole::NotPart) {
            return false;
        }
        is_result_of_op(self.op, effective_location(a), effective_location(b))
    }

    /// Returns `true` if the result area lies on `side` of the edge.
    fn has_area_on(&self, label: &OverlayLabel, side: Side) -> bool {
        let loc = |geom: usize| {
            if !self.area[geom] {
                return Location::Exterior;
            }
            let g = label.geom(geom);
            let loc = if g.is_boundary() { g.location(side) } else { g.on };
            loc.unwrap_or(Location::Exterior)
        };
        is_result_of_op(self.op, loc(0), loc(1))
    }

    fn chain_lines(&self) -> Result<Vec<LineString>> {
        let mut degree = vec![0usize; self.graph.nodes().len()];
        let mut edges = Vec::new();
        for e in self.graph.half_edge_ids() {
            let he = self.graph.half_edge(e)?;
            if he.in_result_line {
                degree[he.node] += 1;
                edges.push(e);
            }
        }
        let mut visited: SecondaryMap<HalfEdgeId, ()> = SecondaryMap::new();
        let mut lines = Vec::new();
        // Open chains start at nodes that do not continue a line.
        for &e in &edges {
            if !visited.contains_key(e) && degree[self.graph.half_edge(e)?.node] != 2 {
                lines.push(self.walk(e, &degree, &mut visited)?);
            }
        }
        // What is left are closed loops.
        for &e in &edges {
            if !visited.contains_key(e) {
                lines.push(self.walk(e, &degree, &mut visited)?);
            }
        }
        Ok(lines)
    }

    fn walk(
        &self,
        start: HalfEdgeId,
        degree: &[usize],
        visited: &mut SecondaryMap<HalfEdgeId, ()>,
    ) -> Result<LineString> {
        let mut coords: Vec<Coordinate> = vec![self.graph.origin(start)?];
        let mut e = start;
        loop {
            let he = self.graph.half_edge(e)?;
            let sym = he.sym;
            visited.insert(e, ());
            visited.insert(sym, ());
            coords.push(he.dest);
            if degree[self.graph.half_edge(sym)?.node] != 2 {
                break;
            }
            let mut next = None;
            for f in self.graph.rotation(sym)? {
                if f != sym && self.graph.half_edge(f)?.in_result_line {
                    next = Some(f);
                    break;
                }
            }
            match next {
                Some(f) if !visited.contains_key(f) => e = f,
                _ => break,
            }
        }
        Ok(LineString::new(coords))
    }
}

fn is_interior_collapse(g: &GeometryLabel) -> bool {
    g.role == EdgeRole::Collapse && g.on == Some(Location::Interior)
}

fn effective_location(g: &GeometryLabel) -> Location {
    match g.role {
        EdgeRole::Line | EdgeRole::Collapse => Location::Interior,
        EdgeRole::Boundary | EdgeRole::NotPart => g.on.unwrap_or(Location::Exterior),
    }
}
