use tracing::trace;

use super::select::{is_result_of_op, OverlayOp};
use crate::error::{OverlayError, Result, TopologyError};
use crate::geometry::{Dimension, Geometry, Location, PointLocator, Polygon};
use crate::topology::{EdgeRole, HalfEdgeId, OverlayGraph, OverlayLabel, Side};

/// Completes the labels of an overlay graph and marks the result area.
///
/// Labelling runs per input. For an area input:
///
/// 1. at every node touched by the input's boundary, the side locations
///    of the boundary edges are walked around the node and copied onto the
///    other edges there;
/// 2. known locations are flooded through nodes the boundary does not
///    touch;
/// 3. collapsed boundary edges are placed inside the shell (for holes) or
///    outside it, then flooded again;
/// 4. edges still unknown are located against the input geometry.
///
/// For a line input every edge not on the line is exterior.
pub struct OverlayLabeller<'a> {
    graph: &'a mut OverlayGraph,
    inputs: [&'a Geometry; 2],
    locator: PointLocator,
}

impl<'a> OverlayLabeller<'a> {
    #[must_use]
    pub fn new(graph: &'a mut OverlayGraph, a: &'a Geometry, b: &'a Geometry) -> Self {
        Self {
            graph,
            inputs: [a, b],
            locator: PointLocator::new(),
        }
    }

    fn is_area(&self, geom: usize) -> bool {
        self.inputs[geom].dimension() == Dimension::Area
    }

    /// Resolves the location of every edge with respect to both inputs.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SideLocationConflict`] or
    /// [`TopologyError::SingleNullSide`] if the side locations around a
    /// node contradict each other.
    pub fn compute_labelling(&mut self) -> Result<()> {
        let nodes = self.graph.nodes().to_vec();
        for geom in 0..2 {
            if !self.is_area(geom) {
                self.label_line_input(geom)?;
                continue;
            }
            for &node in &nodes {
                self.propagate_area_locations(node, geom)?;
            }
            self.propagate_known(geom)?;
            self.label_collapses(geom)?;
            self.label_disconnected(geom)?;
        }
        trace!(edges = self.graph.half_edge_count() / 2, "overlay graph labelled");
        Ok(())
    }

    fn propagate_area_locations(&mut self, node: HalfEdgeId, geom: usize) -> Result<()> {
        let ring = self.graph.rotation(node)?;
        let mut start = None;
        for (k, &e) in ring.iter().enumerate() {
            if self.graph.label(e)?.geom(geom).is_boundary() {
                start = Some(k);
                break;
            }
        }
        let Some(start) = start else {
            return Ok(());
        };
        let Some(mut current) = self.graph.label(ring[start])?.location(geom, Side::Left) else {
            return Err(self.single_null_side(ring[start], geom)?);
        };
        let n = ring.len();
        for step in 1..n {
            let e = ring[(start + step) % n];
            let label = *self.graph.label(e)?.geom(geom);
            if !label.is_boundary() {
                self.graph.set_edge_location(e, geom, current)?;
                continue;
            }
            if label.right != Some(current) {
                let at = self.graph.origin(e)?;
                return Err(TopologyError::SideLocationConflict {
                    geom_index: geom,
                    x: at.x,
                    y: at.y,
                }
                .into());
            }
            current = match label.left {
                Some(left) => left,
                None => return Err(self.single_null_side(e, geom)?),
            };
        }
        Ok(())
    }

    fn single_null_side(&self, e: HalfEdgeId, geom: usize) -> Result<OverlayError> {
        let at = self.graph.origin(e)?;
        Ok(TopologyError::SingleNullSide {
            geom_index: geom,
            x: at.x,
            y: at.y,
        }
        .into())
    }

    fn is_unknown(&self, e: HalfEdgeId, geom: usize) -> Result<bool> {
        Ok(self.graph.label(e)?.geom(geom).is_unknown())
    }

    /// Floods from every resolved non-boundary edge.
    fn propagate_known(&mut self, geom: usize) -> Result<()> {
        let mut stack = Vec::new();
        for e in self.graph.half_edge_ids().collect::<Vec<_>>() {
            let label = *self.graph.label(e)?.geom(geom);
            if !label.is_boundary() && !label.is_unknown() {
                stack.push(e);
            }
        }
        self.flood(geom, stack)
    }

    /// Copies the location of each stacked edge onto the unknown edges
    /// sharing its origin, and continues from their far ends.
    fn flood(&mut self, geom: usize, mut stack: Vec<HalfEdgeId>) -> Result<()> {
        while let Some(e) = stack.pop() {
            let Some(loc) = self.graph.label(e)?.location(geom, Side::On) else {
                continue;
            };
            for f in self.graph.rotation(e)? {
                if f != e && self.is_unknown(f, geom)? {
                    self.graph.set_edge_location(f, geom, loc)?;
                    stack.push(self.graph.sym(f)?);
                }
            }
        }
        Ok(())
    }

    fn label_collapses(&mut self, geom: usize) -> Result<()> {
        let mut stack = Vec::new();
        for e in self.graph.half_edge_ids().collect::<Vec<_>>() {
            let label = *self.graph.label(e)?.geom(geom);
            if label.role == EdgeRole::Collapse && label.is_unknown() {
                let loc = if label.is_hole {
                    Location::Interior
                } else {
                    Location::Exterior
                };
                self.graph.set_edge_location(e, geom, loc)?;
                stack.push(e);
                stack.push(self.graph.sym(e)?);
            }
        }
        self.flood(geom, stack)
    }

    fn label_disconnected(&mut self, geom: usize) -> Result<()> {
        let input: &'a Geometry = self.inputs[geom];
        let polygons: Vec<&Polygon> = input.polygons();
        for e in self.graph.half_edge_ids().collect::<Vec<_>>() {
            if !self.is_unknown(e, geom)? {
                continue;
            }
            let (orig, dest) = {
                let he = self.graph.half_edge(e)?;
                (he.origin, he.dest)
            };
            let inside = [orig, dest]
                .iter()
                .all(|c| self.locator.locate_in_area(c, &polygons) != Location::Exterior);
            let loc = if inside {
                Location::Interior
            } else {
                Location::Exterior
            };
            trace!(geom, x = orig.x, y = orig.y, ?loc, "located disconnected edge");
            self.graph.set_edge_location(e, geom, loc)?;
            let sym = self.graph.sym(e)?;
            self.flood(geom, vec![e, sym])?;
        }
        Ok(())
    }

    fn label_line_input(&mut self, geom: usize) -> Result<()> {
        for e in self.graph.half_edge_ids().collect::<Vec<_>>() {
            if self.graph.label(e)?.role(geom) == EdgeRole::NotPart {
                self.graph.set_edge_location(e, geom, Location::Exterior)?;
            }
        }
        Ok(())
    }

    /// Marks the half-edges bounding the result area of `op`: boundary
    /// edges of either input whose right side lies in the result. Where
    /// both half-edges of an edge qualify, the result lies on both sides
    /// and neither is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for a stale half-edge.
    pub fn mark_result_area(&mut self, op: OverlayOp) -> Result<()> {
        let ids: Vec<HalfEdgeId> = self.graph.half_edge_ids().collect();
        for &e in &ids {
            let label = self.graph.label(e)?;
            if label.is_boundary_either()
                && is_result_of_op(op, self.area_location(&label, 0), self.area_location(&label, 1))
            {
                self.graph.half_edge_mut(e)?.in_result_area = true;
            }
        }
        for &e in &ids {
            let sym = self.graph.sym(e)?;
            if self.graph.half_edge(e)?.in_result_area && self.graph.half_edge(sym)?.in_result_area {
                self.graph.half_edge_mut(e)?.in_result_area = false;
                self.graph.half_edge_mut(sym)?.in_result_area = false;
            }
        }
        Ok(())
    }

    /// Location of the right side of an edge with respect to area input
    /// `geom`. Line inputs have no area and count as exterior.
    fn area_location(&self, label: &OverlayLabel, geom: usize) -> Location {
        if !self.is_area(geom) {
            return Location::Exterior;
        }
        let g = label.geom(geom);
        let loc = if g.is_boundary() { g.right } else { g.on };
        loc.unwrap_or(Location::Exterior)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::Coordinate;
    use crate::noding::{IntersectionNoder, Noder};
    use crate::operations::overlay::edge_source::EdgeSourceBuilder;
    use crate::topology::{Edge, EdgeMerger, GeometryLabel};

    pub(crate) fn build_graph(a: &Geometry, b: &Geometry) -> OverlayGraph {
        let mut source = EdgeSourceBuilder::new(None);
        source.add(a, 0).unwrap();
        source.add(b, 1).unwrap();
        let noded = IntersectionNoder::new().node(source.into_strings()).unwrap();
        let mut merger = EdgeMerger::new();
        merger.add_strings(&noded).unwrap();
        OverlayGraph::build(merger.into_edges()).unwrap()
    }

    pub(crate) fn find(graph: &OverlayGraph, from: (f64, f64), to: (f64, f64)) -> HalfEdgeId {
        let from = Coordinate::from(from);
        let to = Coordinate::from(to);
        graph
            .half_edge_ids()
            .find(|&e| {
                let he = graph.half_edge(e).unwrap();
                he.origin.equals_2d(&from) && he.dest.equals_2d(&to)
            })
            .unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::rectangle(x0, y0, x1, y1))
    }

    #[test]
    fn every_side_is_resolved() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let mut graph = build_graph(&a, &b);
        OverlayLabeller::new(&mut graph, &a, &b)
            .compute_labelling()
            .unwrap();
        for e in graph.half_edge_ids() {
            let label = graph.label(e).unwrap();
            for geom in 0..2 {
                assert!(label.location(geom, Side::Left).is_some());
                assert!(label.location(geom, Side::Right).is_some());
                assert!(label.location(geom, Side::On).is_some());
            }
        }
        let inside_b = graph.label(find(&graph, (10.0, 5.0), (10.0, 10.0))).unwrap();
        assert_eq!(inside_b.location(1, Side::On), Some(Location::Interior));
        let outside_b = graph.label(find(&graph, (0.0, 0.0), (10.0, 0.0))).unwrap();
        assert_eq!(outside_b.location(1, Side::On), Some(Location::Exterior));
    }

    #[test]
    fn disconnected_edges_are_located() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(2.0, 2.0, 4.0, 4.0);
        let mut graph = build_graph(&a, &b);
        OverlayLabeller::new(&mut graph, &a, &b)
            .compute_labelling()
            .unwrap();
        let b_edge = graph.label(find(&graph, (2.0, 2.0), (4.0, 2.0))).unwrap();
        assert_eq!(b_edge.location(0, Side::On), Some(Location::Interior));
        let a_edge = graph.label(find(&graph, (0.0, 0.0), (10.0, 0.0))).unwrap();
        assert_eq!(a_edge.location(1, Side::Left), Some(Location::Exterior));
    }

    #[test]
    fn intersection_marks_only_the_shared_region() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let mut graph = build_graph(&a, &b);
        let mut labeller = OverlayLabeller::new(&mut graph, &a, &b);
        labeller.compute_labelling().unwrap();
        labeller.mark_result_area(OverlayOp::Intersection).unwrap();
        let marked = graph
            .half_edge_ids()
            .filter(|&e| graph.half_edge(e).unwrap().in_result_area)
            .count();
        // The 5 x 5 square, one segment per side.
        assert_eq!(marked, 4);
    }

    #[test]
    fn identical_inputs_mark_the_shared_boundary_once() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let mut graph = build_graph(&a, &a);
        let mut labeller = OverlayLabeller::new(&mut graph, &a, &a);
        labeller.compute_labelling().unwrap();
        labeller.mark_result_area(OverlayOp::Union).unwrap();
        for e in graph.half_edge_ids().collect::<Vec<_>>() {
            let sym = graph.sym(e).unwrap();
            let both = graph.half_edge(e).unwrap().in_result_area && graph.half_edge(sym).unwrap().in_result_area;
            assert!(!both);
        }
    }

    #[test]
    fn contradicting_sides_are_reported() {
        let interior_right = OverlayLabel::new(GeometryLabel::boundary(1, false), GeometryLabel::default());
        let edges = vec![
            Edge {
                orig: Coordinate::new(0.0, 0.0),
                dest: Coordinate::new(1.0, 0.0),
                label: interior_right,
            },
            Edge {
                orig: Coordinate::new(0.0, 0.0),
                dest: Coordinate::new(0.0, 1.0),
                label: interior_right,
            },
        ];
        let mut graph = OverlayGraph::build(edges).unwrap();
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        let err = OverlayLabeller::new(&mut graph, &a, &b)
            .compute_labelling()
            .unwrap_err();
        assert!(matches!(
            err,
            OverlayError::Topology(TopologyError::SideLocationConflict { geom_index: 0, .. })
        ));
        assert!(err.is_recoverable());
    }
}
