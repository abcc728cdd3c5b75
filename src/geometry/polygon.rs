use super::{Coordinate, Envelope, LinearRing};
use crate::math::polygon_2d::rotate_to_canonical_start;

/// A polygon: one shell and zero or more holes.
///
/// An empty shell denotes the empty polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    exterior: LinearRing,
    interiors: Vec<LinearRing>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Creates a hole-free polygon from `(x, y)` pairs of its shell.
    #[must_use]
    pub fn from_xy(shell: &[(f64, f64)]) -> Self {
        Self::new(LinearRing::from_xy(shell), Vec::new())
    }

    /// Creates an axis-aligned rectangle.
    #[must_use]
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::from_xy(&[
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
        ])
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    #[must_use]
    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }

    /// Shell followed by holes.
    pub fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|h| h.signed_area().abs()).sum();
        self.exterior.signed_area().abs() - holes
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.exterior.envelope()
    }

    /// Number of vertices over all rings.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.rings().map(|r| r.coords().len()).sum()
    }

    /// Canonical form: counter-clockwise shell, clockwise holes, every ring
    /// starting at its lowest vertex, holes sorted by that vertex.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let shell = normalize_ring(&self.exterior, true);
        let mut holes: Vec<LinearRing> = self
            .interiors
            .iter()
            .map(|h| normalize_ring(h, false))
            .collect();
        holes.sort_by(|a, b| first_coord(a).compare_2d(&first_coord(b)));
        Self::new(shell, holes)
    }
}

fn first_coord(ring: &LinearRing) -> Coordinate {
    ring.coords()
        .first()
        .copied()
        .unwrap_or_else(|| Coordinate::new(f64::NAN, f64::NAN))
}

fn normalize_ring(ring: &LinearRing, ccw: bool) -> LinearRing {
    let oriented = if ring.is_ccw() == ccw {
        ring.clone()
    } else {
        ring.reversed()
    };
    let coords = oriented.coords();
    if coords.len() < 2 {
        return oriented;
    }
    // Rotate on the planar positions, then map back to the original
    // coordinates so z/m survive.
    let points = oriented.points();
    let rotated = rotate_to_canonical_start(&points);
    let start = points
        .iter()
        .position(|p| *p == rotated[0])
        .unwrap_or(0);
    let open = &coords[..coords.len() - 1];
    let mut out = Vec::with_capacity(coords.len());
    out.extend_from_slice(&open[start..]);
    out.extend_from_slice(&open[..start]);
    LinearRing::new(out)
}
