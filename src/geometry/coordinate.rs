use std::cmp::Ordering;

use crate::math::Point2;

/// A planar position with optional elevation and measure.
///
/// Only `x` and `y` take part in overlay topology. `z` and `m` are carried
/// along wherever an input vertex survives into the result; computed
/// intersection points carry neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coordinate {
    /// Creates a 2D coordinate.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Creates a coordinate with all four ordinates.
    #[must_use]
    pub fn new_xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }

    /// Returns the planar position.
    #[must_use]
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns `true` if x and y are both finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Exact equality of the planar position.
    #[must_use]
    pub fn equals_2d(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Lexicographic order on (x, y).
    #[must_use]
    pub fn compare_2d(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// Hashable key identifying the planar position bit for bit.
    ///
    /// `-0.0` and `0.0` map to the same key.
    #[must_use]
    pub fn key(&self) -> CoordKey {
        CoordKey(canonical_bits(self.x), canonical_bits(self.y))
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.xy() - other.xy()).norm()
    }
}

impl From<Point2> for Coordinate {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Exact planar position usable as a hash map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey(u64, u64);

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}
