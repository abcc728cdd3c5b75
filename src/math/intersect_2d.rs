use super::double_double::DoubleDouble;
use super::predicates::{orientation, Orientation};
use super::Point2;

/// Result of intersecting two line segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments are disjoint.
    None,
    /// The segments meet in a single point.
    ///
    /// `proper` is `true` when the point is interior to both segments. A
    /// non-proper point is always one of the input endpoints, bit for bit.
    Point { point: Point2, proper: bool },
    /// The segments are collinear and overlap between `start` and `end`,
    /// both of which are input endpoints.
    Collinear { start: Point2, end: Point2 },
}

/// Intersects segment `p1-p2` with segment `q1-q2`.
///
/// Orientation tests are exact, so the topological answer (disjoint,
/// touching, crossing, overlapping) is consistent regardless of round-off.
/// Only the coordinate of a proper crossing is approximate.
#[must_use]
pub fn segment_intersection(
    p1: &Point2,
    p2: &Point2,
    q1: &Point2,
    q2: &Point2,
) -> SegmentIntersection {
    if !envelopes_intersect(p1, p2, q1, q2) {
        return SegmentIntersection::None;
    }

    let pq1 = orientation(p1, p2, q1);
    let pq2 = orientation(p1, p2, q2);
    if pq1.same_side(pq2) {
        return SegmentIntersection::None;
    }

    let qp1 = orientation(q1, q2, p1);
    let qp2 = orientation(q1, q2, p2);
    if qp1.same_side(qp2) {
        return SegmentIntersection::None;
    }

    let collinear = Orientation::Collinear;
    if pq1 == collinear && pq2 == collinear && qp1 == collinear && qp2 == collinear {
        return collinear_intersection(p1, p2, q1, q2);
    }

    if pq1 == collinear || pq2 == collinear || qp1 == collinear || qp2 == collinear {
        // Touching at an endpoint. Shared endpoints are checked first so the
        // returned coordinate is an exact input coordinate.
        let point = if p1 == q1 || p1 == q2 {
            *p1
        } else if p2 == q1 || p2 == q2 {
            *p2
        } else if pq1 == collinear {
            *q1
        } else if pq2 == collinear {
            *q2
        } else if qp1 == collinear {
            *p1
        } else {
            *p2
        };
        return SegmentIntersection::Point {
            point,
            proper: false,
        };
    }

    SegmentIntersection::Point {
        point: proper_intersection_point(p1, p2, q1, q2),
        proper: true,
    }
}

fn collinear_intersection(
    p1: &Point2,
    p2: &Point2,
    q1: &Point2,
    q2: &Point2,
) -> SegmentIntersection {
    let q1_in_p = in_envelope(p1, p2, q1);
    let q2_in_p = in_envelope(p1, p2, q2);
    let p1_in_q = in_envelope(q1, q2, p1);
    let p2_in_q = in_envelope(q1, q2, p2);

    let (start, end) = if q1_in_p && q2_in_p {
        (*q1, *q2)
    } else if p1_in_q && p2_in_q {
        (*p1, *p2)
    } else if q1_in_p && p1_in_q {
        (*q1, *p1)
    } else if q1_in_p && p2_in_q {
        (*q1, *p2)
    } else if q2_in_p && p1_in_q {
        (*q2, *p1)
    } else if q2_in_p && p2_in_q {
        (*q2, *p2)
    } else {
        return SegmentIntersection::None;
    };

    if start == end {
        SegmentIntersection::Point {
            point: start,
            proper: false,
        }
    } else {
        SegmentIntersection::Collinear { start, end }
    }
}

/// Computes the crossing point of two properly intersecting segments.
///
/// The coordinates are translated to the centre of the envelope common to
/// both segments before the homogeneous line equations are evaluated, and
/// the whole computation runs in double-double precision. The result is
/// clamped into that common envelope, which a proper crossing always lies
/// in; axis-parallel segments therefore meet at their exact crossing.
fn proper_intersection_point(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> Point2 {
    let min_x = p1.x.min(p2.x).max(q1.x.min(q2.x));
    let max_x = p1.x.max(p2.x).min(q1.x.max(q2.x));
    let min_y = p1.y.min(p2.y).max(q1.y.min(q2.y));
    let max_y = p1.y.max(p2.y).min(q1.y.max(q2.y));
    let mid = Point2::new((min_x + max_x) * 0.5, (min_y + max_y) * 0.5);

    let shift = |c: &Point2| (DoubleDouble::diff(c.x, mid.x), DoubleDouble::diff(c.y, mid.y));
    let (p1x, p1y) = shift(p1);
    let (p2x, p2y) = shift(p2);
    let (q1x, q1y) = shift(q1);
    let (q2x, q2y) = shift(q2);

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;

    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let cx = (x / w + DoubleDouble::new(mid.x)).to_f64();
    let cy = (y / w + DoubleDouble::new(mid.y)).to_f64();
    if !cx.is_finite() || !cy.is_finite() {
        return mid;
    }
    Point2::new(cx.clamp(min_x, max_x), cy.clamp(min_y, max_y))
}

/// Minimum distance from `p` to the segment `a-b`.
#[must_use]
pub fn point_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns `true` if `q` lies in the bounding box of `p1-p2` (inclusive).
#[must_use]
pub fn in_envelope(p1: &Point2, p2: &Point2, q: &Point2) -> bool {
    q.x >= p1.x.min(p2.x) && q.x <= p1.x.max(p2.x) && q.y >= p1.y.min(p2.y) && q.y <= p1.y.max(p2.y)
}

fn envelopes_intersect(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> bool {
    p1.x.min(p2.x) <= q1.x.max(q2.x)
        && q1.x.min(q2.x) <= p1.x.max(p2.x)
        && p1.y.min(p2.y) <= q1.y.max(q2.y)
        && q1.y.min(q2.y) <= p1.y.max(p2.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn proper_crossing() {
        let r = segment_intersection(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0));
        let SegmentIntersection::Point { point, proper } = r else {
            panic!("expected a point, got {r:?}");
        };
        assert!(proper);
        assert_abs_diff_eq!(point.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(point.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn disjoint_segments() {
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0));
        assert_eq!(r, SegmentIntersection::None);
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 0.0), &p(3.0, -5.0));
        assert_eq!(r, SegmentIntersection::None);
    }

    #[test]
    fn endpoint_touching_interior() {
        let r = segment_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(4.0, 0.0), &p(4.0, 5.0));
        assert_eq!(
            r,
            SegmentIntersection::Point {
                point: p(4.0, 0.0),
                proper: false
            }
        );
    }

    #[test]
    fn shared_endpoint() {
        let r = segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0));
        assert_eq!(
            r,
            SegmentIntersection::Point {
                point: p(1.0, 1.0),
                proper: false
            }
        );
    }

    #[test]
    fn collinear_overlap() {
        let r = segment_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.0, 0.0), &p(15.0, 0.0));
        assert_eq!(
            r,
            SegmentIntersection::Collinear {
                start: p(5.0, 0.0),
                end: p(10.0, 0.0)
            }
        );
    }

    #[test]
    fn collinear_touching_is_a_point() {
        let r = segment_intersection(&p(0.0, 0.0), &p(5.0, 0.0), &p(5.0, 0.0), &p(9.0, 0.0));
        assert_eq!(
            r,
            SegmentIntersection::Point {
                point: p(5.0, 0.0),
                proper: false
            }
        );
    }

    #[test]
    fn crossing_point_stays_inside_envelopes() {
        // Nearly parallel segments: the computed point must not escape.
        let p1 = p(0.0, 0.0);
        let p2 = p(1.0e6, 1.0);
        let q1 = p(0.0, 1.0e-7);
        let q2 = p(1.0e6, 1.0 - 1.0e-7);
        if let SegmentIntersection::Point { point, .. } = segment_intersection(&p1, &p2, &q1, &q2) {
            assert!(in_envelope(&p1, &p2, &point));
            assert!(in_envelope(&q1, &q2, &point));
        } else {
            panic!("segments cross");
        }
    }

    #[test]
    fn axis_parallel_crossings_with_decimal_coordinates_are_exact() {
        let r = segment_intersection(&p(5.0, 5.0), &p(12.7, 5.0), &p(12.0, 4.3), &p(12.0, 12.0));
        assert_eq!(
            r,
            SegmentIntersection::Point {
                point: p(12.0, 5.0),
                proper: true
            }
        );

        for (x, y) in [(0.1, 0.3), (4.3, 12.7), (-1.2, 13.2), (1e-7, 3.3e5), (0.7, -9.9)] {
            let h = segment_intersection(&p(x - 2.1, y), &p(x + 0.3, y), &p(x, y - 0.7), &p(x, y + 1.9));
            assert_eq!(
                h,
                SegmentIntersection::Point {
                    point: p(x, y),
                    proper: true
                },
                "crossing at ({x}, {y})"
            );
        }
    }

    #[test]
    fn slanted_crossing_lies_on_both_segments() {
        let cases = [
            [p(-2.0, 4.0), p(6.0, -3.0), p(-1.2, -1.2), p(13.2, -1.2)],
            [p(0.1, 0.2), p(12.7, 5.3), p(4.3, 9.1), p(7.9, -3.3)],
            [p(1e3, 1e3 + 0.1), p(1e3 + 7.7, 1e3 - 4.4), p(1e3 + 0.3, 1e3 - 2.2), p(1e3 + 5.5, 1e3 + 1.1)],
        ];
        for [p1, p2, q1, q2] in cases {
            let SegmentIntersection::Point { point, proper: true } = segment_intersection(&p1, &p2, &q1, &q2)
            else {
                panic!("segments {p1:?}-{p2:?} and {q1:?}-{q2:?} cross");
            };
            assert!(in_envelope(&p1, &p2, &point));
            assert!(in_envelope(&q1, &q2, &point));
            assert!(point_segment_distance(&point, &p1, &p2) < 1e-12 * 1e3);
            assert!(point_segment_distance(&point, &q1, &q2) < 1e-12 * 1e3);
        }
    }

    #[test]
    fn distance_to_segment() {
        let d = point_segment_distance(&p(5.0, 3.0), &p(0.0, 0.0), &p(10.0, 0.0));
        assert_abs_diff_eq!(d, 3.0);
        let d = point_segment_distance(&p(13.0, 4.0), &p(0.0, 0.0), &p(10.0, 0.0));
        assert_abs_diff_eq!(d, 5.0);
    }
}
