use super::{SegmentSet, SegmentString};
use crate::error::{GeometryError, Result, TopologyError};
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::Point2;

/// Checks that `strings` form a fully noded arrangement.
///
/// Any two segments may only be disjoint, share an endpoint, or be
/// identical. Zero-length segments are rejected as degenerate input.
///
/// # Errors
///
/// Returns [`TopologyError::NotNoded`] at the first interior intersection
/// found, or [`GeometryError::ZeroLengthSegment`].
pub fn validate_noding(strings: &[SegmentString]) -> Result<()> {
    for s in strings {
        for w in s.coords().windows(2) {
            if w[0].equals_2d(&w[1]) {
                return Err(GeometryError::ZeroLengthSegment { x: w[0].x, y: w[0].y }.into());
            }
        }
    }

    let segments = SegmentSet::new(strings, 0.0)?;
    let mut failure: Option<Point2> = None;
    segments.for_each_pair(|s, t| {
        if failure.is_some() {
            return;
        }
        let (a, b) = strings[s.string].segment(s.index);
        let (c, d) = strings[t.string].segment(t.index);
        let (a, b, c, d) = (a.xy(), b.xy(), c.xy(), d.xy());
        let is_end_of_both = |p: &Point2| (*p == a || *p == b) && (*p == c || *p == d);
        match segment_intersection(&a, &b, &c, &d) {
            SegmentIntersection::None => {}
            SegmentIntersection::Point { point, proper } => {
                if proper || !is_end_of_both(&point) {
                    failure = Some(point);
                }
            }
            SegmentIntersection::Collinear { start, end } => {
                let identical = (a == c && b == d) || (a == d && b == c);
                if !identical {
                    failure = Some(if is_end_of_both(&start) { end } else { start });
                }
            }
        }
    });

    match failure {
        Some(p) => Err(TopologyError::NotNoded { x: p.x, y: p.y }.into()),
        None => Ok(()),
    }
}
