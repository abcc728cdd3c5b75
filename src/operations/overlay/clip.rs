use crate::geometry::{Coordinate, Envelope};
use crate::noding::push_distinct;

/// Box edges in clipping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoxEdge {
    Bottom,
    Right,
    Top,
    Left,
}

const CLIP_ORDER: [BoxEdge; 4] = [BoxEdge::Bottom, BoxEdge::Right, BoxEdge::Top, BoxEdge::Left];

/// Clips rings to a rectangle, one half-plane at a time.
///
/// Vertices inside or exactly on the rectangle are preserved. Segments
/// crossing a box edge are cut at the edge by linear interpolation, and
/// the clipped chain is closed again after the last edge. Parts of
/// the rectangle boundary may appear in the output; they are cancelled
/// by the overlay when they do not belong to the result.
#[derive(Debug, Clone, Copy)]
pub struct RingClipper {
    env: Envelope,
}

impl RingClipper {
    #[must_use]
    pub fn new(env: Envelope) -> Self {
        Self { env }
    }

    /// Returns `true` if nothing of a geometry with envelope `env`
    /// survives clipping.
    #[must_use]
    pub fn is_clipped_completely(&self, env: &Envelope) -> bool {
        !env.intersects(&self.env)
    }

    /// Clips a closed ring. The output is closed, or empty if nothing of
    /// the ring is inside the rectangle.
    #[must_use]
    pub fn clip(&self, ring: &[Coordinate]) -> Vec<Coordinate> {
        let mut pts = ring.to_vec();
        for edge in CLIP_ORDER {
            pts = self.clip_to_edge(&pts, edge, edge == BoxEdge::Left);
            if pts.is_empty() {
                break;
            }
        }
        pts
    }

    fn clip_to_edge(&self, pts: &[Coordinate], edge: BoxEdge, close: bool) -> Vec<Coordinate> {
        let mut out = Vec::with_capacity(pts.len() + 2);
        let Some(mut p0) = pts.last().copied() else {
            return out;
        };
        for &p1 in pts {
            if self.is_inside(&p1, edge) {
                if !self.is_inside(&p0, edge) {
                    push_distinct(&mut out, self.intersection(&p0, &p1, edge));
                }
                push_distinct(&mut out, p1);
            } else if self.is_inside(&p0, edge) {
                push_distinct(&mut out, self.intersection(&p0, &p1, edge));
            }
            p0 = p1;
        }
        if close {
            if let (Some(&first), Some(last)) = (out.first(), out.last()) {
                if !first.equals_2d(last) {
                    out.push(first);
                }
            }
        }
        out
    }

    fn is_inside(&self, p: &Coordinate, edge: BoxEdge) -> bool {
        match edge {
            BoxEdge::Bottom => p.y >= self.env.min_y,
            BoxEdge::Right => p.x <= self.env.max_x,
            BoxEdge::Top => p.y <= self.env.max_y,
            BoxEdge::Left => p.x >= self.env.min_x,
        }
    }

    /// Crossing of `a-b` with a box edge. Only called with one endpoint
    /// strictly outside, so the denominators are non-zero; they are still
    /// guarded so a degenerate call returns an endpoint instead of NaN.
    fn intersection(&self, a: &Coordinate, b: &Coordinate, edge: BoxEdge) -> Coordinate {
        match edge {
            BoxEdge::Bottom => Coordinate::new(line_x_at(a, b, self.env.min_y), self.env.min_y),
            BoxEdge::Right => Coordinate::new(self.env.max_x, line_y_at(a, b, self.env.max_x)),
            BoxEdge::Top => Coordinate::new(line_x_at(a, b, self.env.max_y), self.env.max_y),
            BoxEdge::Left => Coordinate::new(self.env.min_x, line_y_at(a, b, self.env.min_x)),
        }
    }
}

fn line_x_at(a: &Coordinate, b: &Coordinate, y: f64) -> f64 {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return a.x;
    }
    (a.x + (y - a.y) * ((b.x - a.x) / dy)).clamp(a.x.min(b.x), a.x.max(b.x))
}

fn line_y_at(a: &Coordinate, b: &Coordinate, x: f64) -> f64 {
    let dx = b.x - a.x;
    if dx == 0.0 {
        return a.y;
    }
    (a.y + (x - a.x) * ((b.y - a.y) / dx)).clamp(a.y.min(b.y), a.y.max(b.y))
}

/// Limits lines to the sections near a rectangle.
///
/// Keeps every run of segments touching the rectangle, including the
/// segment leading in and the one leading out, so the kept sections are
/// unchanged parts of the input line. Segments entirely outside are
/// dropped.
#[derive(Debug, Clone, Copy)]
pub struct LineLimiter {
    env: Envelope,
}

impl LineLimiter {
    #[must_use]
    pub fn new(env: Envelope) -> Self {
        Self { env }
    }

    /// Splits `pts` into the sections that touch the rectangle.
    #[must_use]
    pub fn limit(&self, pts: &[Coordinate]) -> Vec<Vec<Coordinate>> {
        let mut sections = Vec::new();
        let mut section: Vec<Coordinate> = Vec::new();
        let mut prev: Option<Coordinate> = None;
        for &p in pts {
            let seg_touches = prev.is_some_and(|q| Envelope::of_segment(&q, &p).intersects(&self.env));
            if seg_touches || self.env.contains_coord(&p) {
                if let (true, true, Some(q)) = (section.is_empty(), seg_touches, prev) {
                    push_distinct(&mut section, q);
                }
                push_distinct(&mut section, p);
            } else if !section.is_empty() {
                sections.push(std::mem::take(&mut section));
            }
            prev = Some(p);
        }
        if !section.is_empty() {
            sections.push(section);
        }
        sections.retain(|s| s.len() >= 2);
        sections
    }
}
