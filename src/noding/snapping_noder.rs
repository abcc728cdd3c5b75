use std::collections::HashMap;

use tracing::trace;

use super::{remove_repeated, NodeLists, Noder, SegmentSet, SegmentString};
use crate::error::Result;
use crate::geometry::Coordinate;
use crate::math::intersect_2d::{point_segment_distance, segment_intersection, SegmentIntersection};

/// Nodes segment strings, snapping vertices and intersections together
/// when they lie within a distance tolerance.
///
/// Input vertices are snapped to the first vertex seen within tolerance,
/// proper intersections are snapped to nearby vertices, and a vertex lying
/// within tolerance of another segment's interior becomes a node of that
/// segment. This removes the near-coincident configurations that make
/// floating noding fail.
#[derive(Debug, Clone, Copy)]
pub struct SnappingNoder {
    tolerance: f64,
}

impl SnappingNoder {
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Noder for SnappingNoder {
    fn node(&self, strings: Vec<SegmentString>) -> Result<Vec<SegmentString>> {
        let mut snap = SnapIndex::new(self.tolerance);
        let snapped: Vec<SegmentString> = strings
            .into_iter()
            .map(|s| {
                let coords = s.coords().iter().map(|c| snap.snap(*c)).collect();
                s.with_coords(coords)
            })
            .collect();
        let strings = remove_repeated(snapped);

        let segments = SegmentSet::new(&strings, self.tolerance)?;
        let mut nodes = NodeLists::new(&strings);
        segments.for_each_pair(|s, t| {
            let (a, b) = strings[s.string].segment(s.index);
            let (c, d) = strings[t.string].segment(t.index);
            match segment_intersection(&a.xy(), &b.xy(), &c.xy(), &d.xy()) {
                SegmentIntersection::Point { point, proper: true } => {
                    let p = snap.snap(Coordinate::from(point));
                    nodes.add(s, p);
                    nodes.add(t, p);
                }
                isect @ (SegmentIntersection::Point { .. } | SegmentIntersection::Collinear { .. }) => {
                    nodes.add_intersection(&strings, s, t, isect);
                }
                SegmentIntersection::None => {}
            }
            for v in [c, d] {
                if self.is_near_interior(v, a, b) {
                    nodes.add(s, *v);
                }
            }
            for v in [a, b] {
                if self.is_near_interior(v, c, d) {
                    nodes.add(t, *v);
                }
            }
        });
        trace!(tolerance = self.tolerance, snapped_points = snap.len(), "snapping noding");
        Ok(remove_repeated(nodes.split(strings)))
    }
}

impl SnappingNoder {
    /// Returns `true` if `v` is within tolerance of the segment `a-b` but is
    /// neither of its endpoints.
    fn is_near_interior(&self, v: &Coordinate, a: &Coordinate, b: &Coordinate) -> bool {
        if v.equals_2d(a) || v.equals_2d(b) {
            return false;
        }
        point_segment_distance(&v.xy(), &a.xy(), &b.xy()) < self.tolerance
    }
}

/// Grid-hashed set of snap targets.
///
/// Cells are as wide as the tolerance, so every point within tolerance of
/// a query lies in the query cell or one of its eight neighbours. The
/// earliest inserted point wins, which keeps snapping independent of
/// hash order.
struct SnapIndex {
    tolerance: f64,
    cell_factor: f64,
    points: Vec<Coordinate>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SnapIndex {
    fn new(tolerance: f64) -> Self {
        let cell = if tolerance > 0.0 { tolerance } else { 1.0 };
        Self {
            tolerance,
            cell_factor: cell.recip(),
            points: Vec::new(),
            cells: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, c: &Coordinate) -> (i64, i64) {
        (
            (c.x * self.cell_factor).floor() as i64,
            (c.y * self.cell_factor).floor() as i64,
        )
    }

    /// Returns the earliest point within tolerance of `c`, or inserts `c`
    /// and returns it.
    fn snap(&mut self, c: Coordinate) -> Coordinate {
        let (cx, cy) = self.cell(&c);
        let mut best: Option<usize> = None;
        for i in cx.saturating_sub(1)..=cx.saturating_add(1) {
            for j in cy.saturating_sub(1)..=cy.saturating_add(1) {
                let Some(ids) = self.cells.get(&(i, j)) else {
                    continue;
                };
                for &id in ids {
                    let p = &self.points[id];
                    let within = p.equals_2d(&c) || p.distance(&c) <= self.tolerance;
                    if within && best.is_none_or(|b| id < b) {
                        best = Some(id);
                    }
                }
            }
        }
        if let Some(id) = best {
            return self.points[id];
        }
        self.cells.entry((cx, cy)).or_default().push(self.points.len());
        self.points.push(c);
        c
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::{line, xy};
    use super::*;
    use crate::noding::validate_noding;

    #[test]
    fn snap_index_prefers_first_point() {
        let mut index = SnapIndex::new(0.1);
        let a = index.snap(Coordinate::new(1.0, 1.0));
        let b = index.snap(Coordinate::new(1.05, 1.0));
        let c = index.snap(Coordinate::new(1.2, 1.0));
        assert_eq!(a, b);
        assert_eq!(c, Coordinate::new(1.2, 1.0));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn near_coincident_vertices_are_merged() {
        let out = SnappingNoder::new(1e-6)
            .node(vec![
                line(0, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
                line(1, &[(10.0 + 1e-9, -5.0), (10.0 + 1e-9, 0.0 + 1e-9), (20.0, 0.0)]),
            ])
            .unwrap();
        assert_eq!(xy(&out[1])[1], (10.0, 0.0));
        validate_noding(&out).unwrap();
    }

    #[test]
    fn vertex_near_segment_becomes_node() {
        let out = SnappingNoder::new(1e-6)
            .node(vec![
                line(0, &[(0.0, 0.0), (10.0, 0.0)]),
                line(1, &[(5.0, 1e-9), (5.0, 5.0)]),
            ])
            .unwrap();
        assert_eq!(xy(&out[0]), vec![(0.0, 0.0), (5.0, 1e-9), (10.0, 0.0)]);
        validate_noding(&out).unwrap();
    }
}
