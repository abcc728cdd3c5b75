use std::collections::HashSet;

use tracing::trace;

use super::{remove_repeated, IntersectionNoder, NodeLists, Noder, SegmentSet, SegmentString};
use crate::error::Result;
use crate::geometry::{CoordKey, Coordinate, Envelope};
use crate::index::SegmentIndex;
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::precision::PrecisionModel;

/// Snap-rounding noder.
///
/// Every vertex and every intersection point is rounded to the centre of
/// its grid cell (a "hot pixel"); each segment passing through a hot pixel
/// is then noded at the pixel centre. The output is fully noded by
/// construction at the cost of moving vertices by up to half a cell.
///
/// A floating precision model has no grid; noding then falls back to
/// [`IntersectionNoder`].
#[derive(Debug, Clone, Copy)]
pub struct SnapRoundingNoder {
    precision: PrecisionModel,
}

impl SnapRoundingNoder {
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    #[must_use]
    pub fn precision(&self) -> PrecisionModel {
        self.precision
    }
}

impl Noder for SnapRoundingNoder {
    fn node(&self, strings: Vec<SegmentString>) -> Result<Vec<SegmentString>> {
        let PrecisionModel::Fixed { scale } = self.precision else {
            return IntersectionNoder::new().node(strings);
        };
        let pm = self.precision;

        let mut pixels = HotPixels::default();
        let segments = SegmentSet::new(&strings, 0.0)?;
        segments.for_each_pair(|s, t| {
            let (a, b) = strings[s.string].segment(s.index);
            let (c, d) = strings[t.string].segment(t.index);
            match segment_intersection(&a.xy(), &b.xy(), &c.xy(), &d.xy()) {
                SegmentIntersection::None => {}
                SegmentIntersection::Point { point, .. } => {
                    pixels.add(pm.make_precise_coord(&point.into()));
                }
                SegmentIntersection::Collinear { start, end } => {
                    pixels.add(pm.make_precise_coord(&start.into()));
                    pixels.add(pm.make_precise_coord(&end.into()));
                }
            }
        });

        let rounded = remove_repeated(
            strings
                .into_iter()
                .map(|s| {
                    let coords = s.coords().iter().map(|c| pm.make_precise_coord(c)).collect();
                    s.with_coords(coords)
                })
                .collect(),
        );
        for s in &rounded {
            for c in s.coords() {
                pixels.add(*c);
            }
        }

        let half = 0.5 / scale;
        let pixel_envs: Vec<Envelope> = pixels
            .centers
            .iter()
            .map(|c| Envelope::new(c.x, c.y, c.x, c.y).expanded_by(half))
            .collect();
        let pixel_index = SegmentIndex::new(&pixel_envs)?;

        let mut nodes = NodeLists::new(&rounded);
        let segments = SegmentSet::new(&rounded, 0.0)?;
        for (seg, env) in segments.refs.iter().zip(&segments.envelopes) {
            let (a, b) = rounded[seg.string].segment(seg.index);
            for p in pixel_index.query(env) {
                let center = &pixels.centers[p];
                if center.equals_2d(a) || center.equals_2d(b) {
                    continue;
                }
                if hot_pixel_intersects(center, a, b, scale) {
                    nodes.add(*seg, *center);
                }
            }
        }
        trace!(scale, hot_pixels = pixels.centers.len(), "snap-rounding noding");
        Ok(remove_repeated(nodes.split(rounded)))
    }
}

#[derive(Default)]
struct HotPixels {
    centers: Vec<Coordinate>,
    seen: HashSet<CoordKey>,
}

impl HotPixels {
    fn add(&mut self, c: Coordinate) {
        if self.seen.insert(c.key()) {
            self.centers.push(c);
        }
    }
}

/// Tests the segment `a-b` against the pixel centred at `center`.
///
/// Pixels are half-open: the left and bottom edges belong to the pixel,
/// the top and right edges do not, so a segment grazing a shared pixel
/// corner is snapped to exactly one of the pixels.
fn hot_pixel_intersects(center: &Coordinate, a: &Coordinate, b: &Coordinate, scale: f64) -> bool {
    let (x0, y0) = ((a.x - center.x) * scale, (a.y - center.y) * scale);
    let (x1, y1) = ((b.x - center.x) * scale, (b.y - center.y) * scale);
    let (dx, dy) = (x1 - x0, y1 - y0);

    // Liang-Barsky clip against [-0.5, 0.5] x [-0.5, 0.5].
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, x0 + 0.5), (dx, 0.5 - x0), (-dy, y0 + 0.5), (dy, 0.5 - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }
    let tm = (t0 + t1) * 0.5;
    x0 + dx * tm < 0.5 && y0 + dy * tm < 0.5
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::{line, xy};
    use super::*;
    use crate::noding::validate_noding;

    #[test]
    fn pixel_test_is_half_open() {
        let center = Coordinate::new(0.0, 0.0);
        let through = (Coordinate::new(-2.0, 0.1), Coordinate::new(2.0, -0.1));
        assert!(hot_pixel_intersects(&center, &through.0, &through.1, 1.0));
        let top_edge = (Coordinate::new(-2.0, 0.5), Coordinate::new(2.0, 0.5));
        assert!(!hot_pixel_intersects(&center, &top_edge.0, &top_edge.1, 1.0));
        let bottom_edge = (Coordinate::new(-2.0, -0.5), Coordinate::new(2.0, -0.5));
        assert!(hot_pixel_intersects(&center, &bottom_edge.0, &bottom_edge.1, 1.0));
        let miss = (Coordinate::new(-2.0, 2.0), Coordinate::new(2.0, 1.0));
        assert!(!hot_pixel_intersects(&center, &miss.0, &miss.1, 1.0));
    }

    #[test]
    fn crossing_is_rounded_into_shared_node() {
        let out = SnapRoundingNoder::new(PrecisionModel::fixed(1.0))
            .node(vec![
                line(0, &[(0.0, 0.0), (10.0, 3.0)]),
                line(1, &[(0.0, 3.0), (10.0, 0.0)]),
            ])
            .unwrap();
        assert_eq!(xy(&out[0]), vec![(0.0, 0.0), (5.0, 2.0), (10.0, 3.0)]);
        assert_eq!(xy(&out[1]), vec![(0.0, 3.0), (5.0, 2.0), (10.0, 0.0)]);
        validate_noding(&out).unwrap();
    }

    #[test]
    fn segment_through_nearby_vertex_pixel_is_noded() {
        let out = SnapRoundingNoder::new(PrecisionModel::fixed(10.0))
            .node(vec![
                line(0, &[(0.0, 0.0), (10.0, 0.0)]),
                line(1, &[(5.02, 0.01), (5.0, 8.0)]),
            ])
            .unwrap();
        assert_eq!(xy(&out[0]), vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        assert_eq!(xy(&out[1])[0], (5.0, 0.0));
        validate_noding(&out).unwrap();
    }
}
