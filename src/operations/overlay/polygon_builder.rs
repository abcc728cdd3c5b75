use slotmap::SecondaryMap;
use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::geometry::{Coordinate, Envelope, LinearRing, Location, Polygon};
use crate::math::polygon_2d::locate_in_ring;
use crate::math::Point2;
use crate::topology::{HalfEdgeId, OverlayGraph};

/// A closed ring of result edges, interior on the right.
struct ResultRing {
    ring: LinearRing,
    envelope: Envelope,
    area: f64,
}

/// Builds the result polygons from the half-edges marked as bounding the
/// result area.
///
/// Every marked half-edge has the result area on its right. Arriving at a
/// node, a ring continues on the first marked half-edge counter-clockwise
/// from the one it came in on, which traces each face separately: rings
/// touching at a node are never joined. Clockwise rings are shells and
/// counter-clockwise rings are holes.
pub struct PolygonBuilder<'a> {
    graph: &'a OverlayGraph,
}

impl<'a> PolygonBuilder<'a> {
    #[must_use]
    pub fn new(graph: &'a OverlayGraph) -> Self {
        Self { graph }
    }

    /// Returns the result polygons with counter-clockwise shells and
    /// clockwise holes. Coordinates are copies of the graph's.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::OpenRing`] if the marked half-edges do not
    /// form closed rings, or [`TopologyError::FreeHole`] if a hole lies in
    /// no shell.
    pub fn build(&self) -> Result<Vec<Polygon>> {
        let mut edges = Vec::new();
        for e in self.graph.half_edge_ids() {
            if self.graph.half_edge(e)?.in_result_area {
                edges.push(e);
            }
        }
        if edges.is_empty() {
            return Ok(Vec::new());
        }
        let links = self.link(&edges)?;
        let (shells, holes) = self.trace(&edges, &links)?;
        let polygons = assign_holes(shells, holes)?;
        trace!(polygons = polygons.len(), "result polygons built");
        Ok(polygons)
    }

    fn link(&self, edges: &[HalfEdgeId]) -> Result<SecondaryMap<HalfEdgeId, HalfEdgeId>> {
        let mut links = SecondaryMap::new();
        for &e in edges {
            let sym = self.graph.sym(e)?;
            let mut f = self.graph.next(sym)?;
            loop {
                if f == sym {
                    let at = self.graph.origin(sym)?;
                    return Err(TopologyError::OpenRing { x: at.x, y: at.y }.into());
                }
                if self.graph.half_edge(f)?.in_result_area {
                    links.insert(e, f);
                    break;
                }
                f = self.graph.next(f)?;
            }
        }
        Ok(links)
    }

    fn trace(
        &self,
        edges: &[HalfEdgeId],
        links: &SecondaryMap<HalfEdgeId, HalfEdgeId>,
    ) -> Result<(Vec<ResultRing>, Vec<ResultRing>)> {
        let mut visited: SecondaryMap<HalfEdgeId, ()> = SecondaryMap::new();
        let mut shells = Vec::new();
        let mut holes = Vec::new();
        for &start in edges {
            if visited.contains_key(start) {
                continue;
            }
            let mut coords: Vec<Coordinate> = Vec::new();
            let mut e = start;
            loop {
                visited.insert(e, ());
                coords.push(self.graph.origin(e)?);
                let Some(&next) = links.get(e) else {
                    let at = self.graph.origin(e)?;
                    return Err(TopologyError::OpenRing { x: at.x, y: at.y }.into());
                };
                if next == start {
                    break;
                }
                if visited.contains_key(next) {
                    let at = self.graph.origin(next)?;
                    return Err(TopologyError::OpenRing { x: at.x, y: at.y }.into());
                }
                e = next;
            }
            let ring = LinearRing::new(coords);
            let area = ring.signed_area();
            let result = ResultRing {
                envelope: ring.envelope(),
                area: area.abs(),
                ring,
            };
            if area < 0.0 {
                shells.push(result);
            } else if area > 0.0 {
                holes.push(result);
            }
        }
        Ok((shells, holes))
    }
}

/// Places each hole in the smallest shell containing it.
fn assign_holes(shells: Vec<ResultRing>, holes: Vec<ResultRing>) -> Result<Vec<Polygon>> {
    let shell_points: Vec<Vec<Point2>> = shells.iter().map(|s| s.ring.points()).collect();
    let mut assigned: Vec<Vec<LinearRing>> = vec![Vec::new(); shells.len()];
    for hole in holes {
        let mut best: Option<usize> = None;
        for (i, shell) in shells.iter().enumerate() {
            if !shell.envelope.contains(&hole.envelope) || !contains_ring(&shell_points[i], &hole.ring) {
                continue;
            }
            if best.is_none_or(|b| shell.area < shells[b].area) {
                best = Some(i);
            }
        }
        match best {
            Some(i) => assigned[i].push(hole.ring.reversed()),
            None => {
                let at = hole.ring.coords().first().copied().unwrap_or(Coordinate::new(0.0, 0.0));
                return Err(TopologyError::FreeHole { x: at.x, y: at.y }.into());
            }
        }
    }
    Ok(shells
        .into_iter()
        .zip(assigned)
        .map(|(shell, holes)| Polygon::new(shell.ring.reversed(), holes))
        .collect())
}

/// Tests the first vertex of `ring` that is not on the shell boundary.
fn contains_ring(shell: &[Point2], ring: &LinearRing) -> bool {
    for c in ring.coords() {
        match locate_in_ring(&c.xy(), shell) {
            Location::Interior => return true,
            Location::Exterior => return false,
            Location::Boundary => {}
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::operations::overlay::labeller::tests::build_graph;
    use crate::operations::overlay::labeller::OverlayLabeller;
    use crate::operations::overlay::select::OverlayOp;
    use approx::assert_abs_diff_eq;

    fn polygons(a: &Geometry, b: &Geometry, op: OverlayOp) -> Vec<Polygon> {
        let mut graph = build_graph(a, b);
        let mut labeller = OverlayLabeller::new(&mut graph, a, b);
        labeller.compute_labelling().unwrap();
        labeller.mark_result_area(op).unwrap();
        PolygonBuilder::new(&graph).build().unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::rectangle(x0, y0, x1, y1))
    }

    #[test]
    fn overlapping_squares_intersect_in_one_polygon() {
        let out = polygons(
            &square(0.0, 0.0, 10.0, 10.0),
            &square(5.0, 5.0, 15.0, 15.0),
            OverlayOp::Intersection,
        );
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].area(), 25.0);
        assert!(out[0].exterior().is_ccw());
    }

    #[test]
    fn difference_creates_hole() {
        let out = polygons(
            &square(0.0, 0.0, 10.0, 10.0),
            &square(2.0, 2.0, 4.0, 4.0),
            OverlayOp::Difference,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].interiors().len(), 1);
        assert!(!out[0].interiors()[0].is_ccw());
        assert_abs_diff_eq!(out[0].area(), 96.0);
    }

    #[test]
    fn squares_touching_at_a_vertex_stay_separate() {
        let out = polygons(
            &square(0.0, 0.0, 1.0, 1.0),
            &square(1.0, 1.0, 2.0, 2.0),
            OverlayOp::Union,
        );
        assert_eq!(out.len(), 2);
        for p in &out {
            assert_abs_diff_eq!(p.area(), 1.0);
            assert_eq!(p.exterior().coords().len(), 5);
        }
    }

    #[test]
    fn no_marked_edges_means_no_polygons() {
        let out = polygons(
            &square(0.0, 0.0, 1.0, 1.0),
            &square(5.0, 5.0, 6.0, 6.0),
            OverlayOp::Intersection,
        );
        assert!(out.is_empty());
    }
}
