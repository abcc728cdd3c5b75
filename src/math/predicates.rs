use std::cmp::Ordering;

use super::double_double::DoubleDouble;
use super::Point2;

/// Relative error bound below which the floating-point determinant is
/// re-evaluated in double-double arithmetic.
const DP_SAFE_EPSILON: f64 = 1e-15;

/// Orientation of a point relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    fn from_signum(sign: i32) -> Self {
        match sign.cmp(&0) {
            Ordering::Greater => Self::CounterClockwise,
            Ordering::Less => Self::Clockwise,
            Ordering::Equal => Self::Collinear,
        }
    }

    fn from_f64(det: f64) -> Self {
        if det > 0.0 {
            Self::CounterClockwise
        } else if det < 0.0 {
            Self::Clockwise
        } else {
            Self::Collinear
        }
    }

    /// Returns `true` if both orientations are strictly on the same side.
    #[must_use]
    pub fn same_side(self, other: Self) -> bool {
        self != Self::Collinear && self == other
    }
}

/// Orientation of `q` relative to the directed line `p1 -> p2`.
///
/// Uses a fast floating-point filter and falls back to double-double
/// arithmetic when the determinant is too close to zero to trust.
#[must_use]
pub fn orientation(p1: &Point2, p2: &Point2, q: &Point2) -> Orientation {
    let det_left = (p1.x - q.x) * (p2.y - q.y);
    let det_right = (p1.y - q.y) * (p2.x - q.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Orientation::from_f64(det);
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Orientation::from_f64(det);
        }
        -det_left - det_right
    } else {
        return Orientation::from_f64(det);
    };

    let err_bound = DP_SAFE_EPSILON * det_sum;
    if det >= err_bound || -det >= err_bound {
        return Orientation::from_f64(det);
    }
    orientation_dd(p1, p2, q)
}

fn orientation_dd(p1: &Point2, p2: &Point2, q: &Point2) -> Orientation {
    let dx1 = DoubleDouble::diff(p2.x, p1.x);
    let dy1 = DoubleDouble::diff(p2.y, p1.y);
    let dx2 = DoubleDouble::diff(q.x, p2.x);
    let dy2 = DoubleDouble::diff(q.y, p2.y);
    let det = dx1 * dy2 - dy1 * dx2;
    Orientation::from_signum(det.signum())
}

/// Returns `true` if the ring (closed, first == last) is counter-clockwise.
///
/// Robust for rings with repeated points and flat stretches; degenerate
/// rings report `false`.
#[must_use]
pub fn is_ccw(ring: &[Point2]) -> bool {
    let n = ring.len().saturating_sub(1);
    if n < 3 {
        return false;
    }

    // Highest point; on ties the first one found.
    let mut hi = 0;
    for i in 1..n {
        if ring[i].y > ring[hi].y {
            hi = i;
        }
    }

    // Previous distinct point.
    let mut prev = hi;
    loop {
        prev = if prev == 0 { n - 1 } else { prev - 1 };
        if ring[prev] != ring[hi] || prev == hi {
            break;
        }
    }
    // Next distinct point.
    let mut next = hi;
    loop {
        next = (next + 1) % n;
        if ring[next] != ring[hi] || next == hi {
            break;
        }
    }

    if ring[prev] == ring[hi] || ring[next] == ring[hi] || ring[prev] == ring[next] {
        return false;
    }

    match orientation(&ring[prev], &ring[hi], &ring[next]) {
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
        // Flat top: the cap runs east-west, so compare x of the neighbours.
        Orientation::Collinear => ring[prev].x > ring[next].x,
    }
}

/// Quadrant of a direction vector, numbered counter-clockwise from the
/// positive x axis.
fn quadrant(dx: f64, dy: f64) -> u8 {
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// Compares the directions `origin -> a` and `origin -> b` by angle,
/// counter-clockwise from the positive x axis.
///
/// Collinear directions in the same quadrant compare equal.
#[must_use]
pub fn compare_direction(origin: &Point2, a: &Point2, b: &Point2) -> Ordering {
    let qa = quadrant(a.x - origin.x, a.y - origin.y);
    let qb = quadrant(b.x - origin.x, b.y - origin.y);
    match qa.cmp(&qb) {
        Ordering::Equal => {}
        ord => return ord,
    }
    match orientation(origin, b, a) {
        Orientation::CounterClockwise => Ordering::Greater,
        Orientation::Clockwise => Ordering::Less,
        Orientation::Collinear => Ordering::Equal,
    }
}
