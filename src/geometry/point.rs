use super::Coordinate;

/// A single position, possibly empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    coord: Option<Coordinate>,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_coord(Coordinate::new(x, y))
    }

    #[must_use]
    pub fn from_coord(coord: Coordinate) -> Self {
        Self { coord: Some(coord) }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { coord: None }
    }

    #[must_use]
    pub fn coord(&self) -> Option<&Coordinate> {
        self.coord.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coord.is_none()
    }
}
