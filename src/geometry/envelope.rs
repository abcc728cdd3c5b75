use super::Coordinate;

/// An axis-aligned bounding box.
///
/// The empty envelope is represented by an inverted box (`min > max`), so
/// expanding it by any coordinate yields that coordinate's point box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

impl Envelope {
    /// Creates an envelope from two corner points in any order.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// The empty envelope.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Envelope of a segment.
    #[must_use]
    pub fn of_segment(a: &Coordinate, b: &Coordinate) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Envelope of a sequence of coordinates.
    pub fn of_coords<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut env = Self::empty();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand_to_include(&mut self, c: &Coordinate) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    pub fn expand_to_include_envelope(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grows the envelope by `distance` on every side.
    #[must_use]
    pub fn expanded_by(&self, distance: f64) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min_x: self.min_x - distance,
            min_y: self.min_y - distance,
            max_x: self.max_x + distance,
            max_y: self.max_y + distance,
        }
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Returns `true` if `c` lies inside or on the boundary.
    #[must_use]
    pub fn contains_coord(&self, c: &Coordinate) -> bool {
        !self.is_empty()
            && c.x >= self.min_x
            && c.x <= self.max_x
            && c.y >= self.min_y
            && c.y <= self.max_y
    }

    /// Returns `true` if `other` lies entirely inside this envelope.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// The common part of two envelopes, empty if they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.intersects(other) {
            return Self::empty();
        }
        Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Largest absolute ordinate value, used to scale tolerances.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.min_x
            .abs()
            .max(self.max_x.abs())
            .max(self.min_y.abs())
            .max(self.max_y.abs())
    }
}
