use crate::geometry::Location;

/// How an edge relates to one input geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeRole {
    /// The edge is not derived from the geometry.
    #[default]
    NotPart,
    /// The edge is part of the geometry's area boundary.
    Boundary,
    /// The edge is a collapsed piece of area boundary: coincident boundary
    /// segments whose sides cancel out.
    Collapse,
    /// The edge is part of a line geometry.
    Line,
}

/// Side of a half-edge relative to its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    On,
}

/// Classification of an edge with respect to one input geometry.
///
/// `left` and `right` are meaningful for area inputs; `on` is the location
/// of the edge line itself. `None` means not yet known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryLabel {
    pub role: EdgeRole,
    /// For boundary and collapse edges: whether every contributing ring
    /// was a hole.
    pub is_hole: bool,
    pub left: Option<Location>,
    pub right: Option<Location>,
    pub on: Option<Location>,
}

impl GeometryLabel {
    /// Label of an area boundary edge. A positive depth delta puts the
    /// interior on the right.
    #[must_use]
    pub fn boundary(depth_delta: i32, is_hole: bool) -> Self {
        let (left, right) = if depth_delta > 0 {
            (Location::Exterior, Location::Interior)
        } else {
            (Location::Interior, Location::Exterior)
        };
        Self {
            role: EdgeRole::Boundary,
            is_hole,
            left: Some(left),
            right: Some(right),
            on: Some(Location::Boundary),
        }
    }

    /// Label of a collapsed boundary edge; its location comes from
    /// propagation.
    #[must_use]
    pub fn collapse(is_hole: bool) -> Self {
        Self {
            role: EdgeRole::Collapse,
            is_hole,
            ..Self::default()
        }
    }

    /// Label of a line edge.
    #[must_use]
    pub fn line() -> Self {
        Self {
            role: EdgeRole::Line,
            on: Some(Location::Interior),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.role == EdgeRole::Boundary
    }

    /// Returns `true` if the edge's location relative to an area is still
    /// unresolved. Boundary edges are always resolved.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        !self.is_boundary() && self.left.is_none()
    }

    /// Places a non-boundary edge wholly at `loc`.
    pub fn set_location(&mut self, loc: Location) {
        self.left = Some(loc);
        self.right = Some(loc);
        self.on = Some(loc);
    }

    #[must_use]
    pub fn location(&self, side: Side) -> Option<Location> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
            Side::On => self.on,
        }
    }

    fn reversed(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
            ..self
        }
    }
}

/// Per-edge classification against both input geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayLabel {
    geoms: [GeometryLabel; 2],
}

impl OverlayLabel {
    #[must_use]
    pub fn new(a: GeometryLabel, b: GeometryLabel) -> Self {
        Self { geoms: [a, b] }
    }

    #[must_use]
    pub fn geom(&self, index: usize) -> &GeometryLabel {
        &self.geoms[index]
    }

    pub fn geom_mut(&mut self, index: usize) -> &mut GeometryLabel {
        &mut self.geoms[index]
    }

    /// The same label seen from the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            geoms: [self.geoms[0].reversed(), self.geoms[1].reversed()],
        }
    }

    #[must_use]
    pub fn location(&self, index: usize, side: Side) -> Option<Location> {
        self.geoms[index].location(side)
    }

    #[must_use]
    pub fn role(&self, index: usize) -> EdgeRole {
        self.geoms[index].role
    }

    #[must_use]
    pub fn is_boundary_either(&self) -> bool {
        self.geoms.iter().any(GeometryLabel::is_boundary)
    }

    #[must_use]
    pub fn is_boundary_both(&self) -> bool {
        self.geoms.iter().all(GeometryLabel::is_boundary)
    }

    /// Returns `true` if the edge is boundary or line of input `index`.
    #[must_use]
    pub fn is_edge_of(&self, index: usize) -> bool {
        matches!(self.geoms[index].role, EdgeRole::Boundary | EdgeRole::Line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_sides_follow_depth_delta() {
        let right = GeometryLabel::boundary(1, false);
        assert_eq!(right.right, Some(Location::Interior));
        assert_eq!(right.left, Some(Location::Exterior));
        assert_eq!(right.on, Some(Location::Boundary));

        let left = GeometryLabel::boundary(-2, true);
        assert_eq!(left.left, Some(Location::Interior));
        assert!(left.is_hole);
    }

    #[test]
    fn reversal_swaps_sides_only() {
        let label = OverlayLabel::new(GeometryLabel::boundary(1, false), GeometryLabel::line());
        let rev = label.reversed();
        assert_eq!(rev.location(0, Side::Left), Some(Location::Interior));
        assert_eq!(rev.location(0, Side::Right), Some(Location::Exterior));
        assert_eq!(rev.location(0, Side::On), Some(Location::Boundary));
        assert_eq!(rev.role(1), EdgeRole::Line);
        assert_eq!(rev.reversed(), label);
    }

    #[test]
    fn collapse_is_unknown_until_located() {
        let mut g = GeometryLabel::collapse(false);
        assert!(g.is_unknown());
        g.set_location(Location::Interior);
        assert!(!g.is_unknown());
        assert_eq!(g.on, Some(Location::Interior));
        assert!(!GeometryLabel::boundary(1, false).is_unknown());
    }

    #[test]
    fn role_queries() {
        let touch = OverlayLabel::new(GeometryLabel::boundary(1, false), GeometryLabel::boundary(-1, false));
        assert!(touch.is_boundary_both());
        let single = OverlayLabel::new(GeometryLabel::boundary(1, false), GeometryLabel::default());
        assert!(single.is_boundary_either());
        assert!(!single.is_boundary_both());
        assert!(!single.is_edge_of(1));
        assert!(single.is_edge_of(0));
    }
}
