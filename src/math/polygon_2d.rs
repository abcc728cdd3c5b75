use super::predicates::{orientation, Orientation};
use super::Point2;
use crate::geometry::Location;

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring may be
/// given open or closed.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Locates `p` relative to a closed ring using ray crossing.
///
/// Points on a ring segment are [`Location::Boundary`]. All comparisons
/// are exact.
#[must_use]
pub fn locate_in_ring(p: &Point2, ring: &[Point2]) -> Location {
    let mut counter = RayCrossingCounter::new(*p);
    for w in ring.windows(2) {
        counter.count_segment(&w[0], &w[1]);
        if counter.on_segment {
            return Location::Boundary;
        }
    }
    counter.location()
}

/// Counts crossings of a horizontal ray from the test point towards +x.
#[derive(Debug)]
pub struct RayCrossingCounter {
    p: Point2,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    #[must_use]
    pub fn new(p: Point2) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    /// Counts one ring segment.
    pub fn count_segment(&mut self, p1: &Point2, p2: &Point2) {
        let p = self.p;
        // Entirely left of the test point.
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == *p2 {
            self.on_segment = true;
            return;
        }
        // Horizontal segment on the ray line.
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        // Half-open rule on y avoids double counting at vertices.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation(p1, p2, &p);
            if orient == Orientation::Collinear {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = match orient {
                    Orientation::Clockwise => Orientation::CounterClockwise,
                    _ => Orientation::Clockwise,
                };
            }
            if orient == Orientation::CounterClockwise {
                self.crossings += 1;
            }
        }
    }

    /// Returns `true` once the test point was found on a counted segment.
    #[must_use]
    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    #[must_use]
    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Rotates a closed ring (first == last) so it starts at the lowest-x
/// vertex, breaking ties by lowest y. The result is closed again.
#[must_use]
pub fn rotate_to_canonical_start(ring: &[Point2]) -> Vec<Point2> {
    if ring.len() < 2 {
        return ring.to_vec();
    }
    let open = &ring[..ring.len() - 1];
    let mut best = 0;
    for (i, pt) in open.iter().enumerate().skip(1) {
        let b = &open[best];
        if pt.x < b.x || (pt.x == b.x && pt.y < b.y) {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(ring.len());
    rotated.extend_from_slice(&open[best..]);
    rotated.extend_from_slice(&open[..best]);
    rotated.push(open[best]);
    rotated
}
