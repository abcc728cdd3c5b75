use super::{Coordinate, Envelope};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::predicates::is_ccw;
use crate::math::Point2;

/// An open or closed sequence of vertices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    coords: Vec<Coordinate>,
}

impl LineString {
    #[must_use]
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self { coords }
    }

    /// Creates a line string from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&p| Coordinate::from(p)).collect())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => self.coords.len() > 1 && first.equals_2d(last),
            _ => false,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.coords.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::of_coords(&self.coords)
    }

    /// Returns the line with its vertex order reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.coords.iter().rev().copied().collect())
    }
}

/// A closed line string bounding an area.
///
/// Construction closes the ring if the last vertex differs from the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearRing {
    line: LineString,
}

impl LinearRing {
    #[must_use]
    pub fn new(mut coords: Vec<Coordinate>) -> Self {
        if let (Some(&first), Some(last)) = (coords.first(), coords.last()) {
            if !first.equals_2d(last) {
                coords.push(first);
            }
        }
        Self {
            line: LineString::new(coords),
        }
    }

    /// Creates a ring from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&p| Coordinate::from(p)).collect())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        self.line.coords()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Planar positions of the ring vertices.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        self.coords().iter().map(Coordinate::xy).collect()
    }

    /// Signed area: positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points())
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        is_ccw(&self.points())
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.line.envelope()
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.line.length()
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            line: self.line.reversed(),
        }
    }
}
