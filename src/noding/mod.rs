//! Noding: turning input segments into a planar arrangement where segments
//! meet only at shared endpoints.

mod intersection_noder;
mod snap_rounding_noder;
mod snapping_noder;
mod validate;

pub use intersection_noder::IntersectionNoder;
pub use snap_rounding_noder::SnapRoundingNoder;
pub use snapping_noder::SnappingNoder;
pub use validate::validate_noding;

use std::cmp::Ordering;

use crate::error::Result;
use crate::geometry::{Coordinate, Dimension, Envelope};
use crate::index::SegmentIndex;
use crate::math::intersect_2d::SegmentIntersection;
use crate::math::Point2;

/// Where a segment string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSource {
    /// Input geometry index, 0 or 1.
    pub geom_index: usize,
    /// Component (polygon ring or line) index within that input.
    pub component: usize,
    /// [`Dimension::Area`] for ring edges, [`Dimension::Line`] for lines.
    pub dimension: Dimension,
    /// +1 if the input's interior lies to the right of the string's
    /// direction, -1 if to the left, 0 for lines.
    pub depth_delta: i32,
    /// `true` for polygon hole rings.
    pub is_hole: bool,
}

/// A chain of vertices tagged with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString {
    coords: Vec<Coordinate>,
    source: EdgeSource,
}

impl SegmentString {
    #[must_use]
    pub fn new(coords: Vec<Coordinate>, source: EdgeSource) -> Self {
        Self { coords, source }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    #[must_use]
    pub fn source(&self) -> EdgeSource {
        self.source
    }

    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// Endpoints of segment `i`.
    #[must_use]
    pub fn segment(&self, i: usize) -> (&Coordinate, &Coordinate) {
        (&self.coords[i], &self.coords[i + 1])
    }

    fn with_coords(&self, coords: Vec<Coordinate>) -> Self {
        Self {
            coords,
            source: self.source,
        }
    }
}

/// Computes a fully noded arrangement of segment strings.
///
/// Implementations return strings in which every intersection point is a
/// vertex of each string passing through it. Strings may be reordered,
/// re-vertexed or dropped when they collapse to a point.
pub trait Noder {
    /// Nodes `strings`.
    ///
    /// # Errors
    ///
    /// Returns an error if an index cannot be built over the input.
    fn node(&self, strings: Vec<SegmentString>) -> Result<Vec<SegmentString>>;
}

/// Position of one segment within a set of strings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentRef {
    pub string: usize,
    pub index: usize,
}

/// All segments of a set of strings with their envelopes and an index
/// over them.
pub(crate) struct SegmentSet {
    pub refs: Vec<SegmentRef>,
    pub envelopes: Vec<Envelope>,
    pub index: SegmentIndex,
}

impl SegmentSet {
    /// Indexes every segment, growing each envelope by `margin`.
    pub fn new(strings: &[SegmentString], margin: f64) -> Result<Self> {
        let mut refs = Vec::new();
        let mut envelopes = Vec::new();
        for (si, s) in strings.iter().enumerate() {
            for i in 0..s.num_segments() {
                let (a, b) = s.segment(i);
                refs.push(SegmentRef {
                    string: si,
                    index: i,
                });
                envelopes.push(Envelope::of_segment(a, b).expanded_by(margin));
            }
        }
        let index = SegmentIndex::new(&envelopes)?;
        Ok(Self {
            refs,
            envelopes,
            index,
        })
    }

    /// Calls `f` once for every pair of segments whose envelopes meet.
    pub fn for_each_pair(&self, mut f: impl FnMut(SegmentRef, SegmentRef)) {
        for (i, env) in self.envelopes.iter().enumerate() {
            for j in self.index.query(env) {
                if j > i {
                    f(self.refs[i], self.refs[j]);
                }
            }
        }
    }
}

/// Node points collected per segment of each string.
pub(crate) struct NodeLists {
    nodes: Vec<Vec<Vec<Coordinate>>>,
}

impl NodeLists {
    pub fn new(strings: &[SegmentString]) -> Self {
        Self {
            nodes: strings
                .iter()
                .map(|s| vec![Vec::new(); s.num_segments()])
                .collect(),
        }
    }

    pub fn add(&mut self, seg: SegmentRef, node: Coordinate) {
        self.nodes[seg.string][seg.index].push(node);
    }

    /// Adds the points of an intersection to both segments.
    pub fn add_intersection(
        &mut self,
        strings: &[SegmentString],
        s: SegmentRef,
        t: SegmentRef,
        intersection: SegmentIntersection,
    ) {
        let points: Vec<Point2> = match intersection {
            SegmentIntersection::None => return,
            SegmentIntersection::Point { point, .. } => vec![point],
            SegmentIntersection::Collinear { start, end } => vec![start, end],
        };
        for p in points {
            let c = input_coordinate(strings, s, t, p);
            self.add(s, c);
            self.add(t, c);
        }
    }

    /// Inserts the collected nodes into their strings.
    ///
    /// Nodes are ordered along each segment; repeated points are removed
    /// and strings collapsing to a single point are dropped.
    pub fn split(self, strings: Vec<SegmentString>) -> Vec<SegmentString> {
        let mut out = Vec::with_capacity(strings.len());
        for (s, mut seg_nodes) in strings.into_iter().zip(self.nodes) {
            let mut coords: Vec<Coordinate> = Vec::with_capacity(s.coords.len());
            for (i, nodes) in seg_nodes.iter_mut().enumerate() {
                let (a, b) = s.segment(i);
                push_distinct(&mut coords, *a);
                sort_along(nodes, a, b);
                for n in nodes.iter() {
                    push_distinct(&mut coords, *n);
                }
            }
            if let Some(last) = s.coords.last() {
                push_distinct(&mut coords, *last);
            }
            if coords.len() >= 2 {
                out.push(s.with_coords(coords));
            }
        }
        out
    }
}

/// Returns the input vertex at `p` if there is one, so that z and m
/// survive; otherwise a new coordinate.
fn input_coordinate(strings: &[SegmentString], s: SegmentRef, t: SegmentRef, p: Point2) -> Coordinate {
    let (a, b) = strings[s.string].segment(s.index);
    let (c, d) = strings[t.string].segment(t.index);
    [a, b, c, d]
        .into_iter()
        .find(|v| v.x == p.x && v.y == p.y)
        .copied()
        .unwrap_or_else(|| Coordinate::from(p))
}

pub(crate) fn push_distinct(coords: &mut Vec<Coordinate>, c: Coordinate) {
    if coords.last().is_none_or(|last| !last.equals_2d(&c)) {
        coords.push(c);
    }
}

/// Sorts points by their projection onto `a-b`, ties broken by position.
fn sort_along(points: &mut [Coordinate], a: &Coordinate, b: &Coordinate) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let param = |p: &Coordinate| (p.x - a.x) * dx + (p.y - a.y) * dy;
    points.sort_by(|p, q| {
        param(p)
            .partial_cmp(&param(q))
            .unwrap_or(Ordering::Equal)
            .then_with(|| p.compare_2d(q))
    });
}

/// Removes consecutive repeated points from every string and drops strings
/// left with fewer than two points.
pub(crate) fn remove_repeated(strings: Vec<SegmentString>) -> Vec<SegmentString> {
    strings
        .into_iter()
        .filter_map(|s| {
            let mut coords = Vec::with_capacity(s.coords.len());
            for c in &s.coords {
                push_distinct(&mut coords, *c);
            }
            (coords.len() >= 2).then(|| s.with_coords(coords))
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::{line, xy};
    use super::*;

    #[test]
    fn split_orders_nodes_along_segment() {
        let strings = vec![line(0, &[(0.0, 0.0), (10.0, 0.0)])];
        let mut nodes = NodeLists::new(&strings);
        let seg = SegmentRef { string: 0, index: 0 };
        nodes.add(seg, Coordinate::new(7.0, 0.0));
        nodes.add(seg, Coordinate::new(3.0, 0.0));
        nodes.add(seg, Coordinate::new(7.0, 0.0));
        nodes.add(seg, Coordinate::new(0.0, 0.0));
        let out = nodes.split(strings);
        assert_eq!(xy(&out[0]), vec![(0.0, 0.0), (3.0, 0.0), (7.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn collapsed_strings_are_dropped() {
        let strings = vec![line(0, &[(1.0, 1.0), (1.0, 1.0)]), line(1, &[(0.0, 0.0), (0.0, 1.0), (0.0, 1.0)])];
        let out = remove_repeated(strings);
        assert_eq!(out.len(), 1);
        assert_eq!(xy(&out[0]), vec![(0.0, 0.0), (0.0, 1.0)]);
    }
}
