use tracing::trace;

use super::{NodeLists, Noder, SegmentSet, SegmentString};
use crate::error::Result;
use crate::math::intersect_2d::segment_intersection;

/// Nodes segment strings in full floating precision.
///
/// Crossing points are computed once and inserted into both segments.
/// Because a computed crossing is generally not exactly on either
/// segment, the output is not guaranteed to be fully noded; callers
/// check it with [`validate_noding`](super::validate_noding).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectionNoder;

impl IntersectionNoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Noder for IntersectionNoder {
    fn node(&self, strings: Vec<SegmentString>) -> Result<Vec<SegmentString>> {
        let segments = SegmentSet::new(&strings, 0.0)?;
        let mut nodes = NodeLists::new(&strings);
        let mut count = 0usize;
        segments.for_each_pair(|s, t| {
            let (a, b) = strings[s.string].segment(s.index);
            let (c, d) = strings[t.string].segment(t.index);
            let isect = segment_intersection(&a.xy(), &b.xy(), &c.xy(), &d.xy());
            count += 1;
            nodes.add_intersection(&strings, s, t, isect);
        });
        trace!(segments = segments.refs.len(), pairs = count, "intersection noding");
        Ok(nodes.split(strings))
    }
}
