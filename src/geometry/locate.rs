use super::{Coordinate, Geometry, LineString, Location, Polygon};
use crate::math::polygon_2d::{locate_in_ring, RayCrossingCounter};

/// Locates points against geometries.
///
/// Areas use ray crossing with exact boundary detection. Lines follow the
/// mod-2 boundary rule: the endpoints of open lines are boundary, unless an
/// even number of lines end there. A point on the boundary of an even
/// number of components is interior.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointLocator;

impl PointLocator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Location of `c` relative to `geometry`.
    #[must_use]
    pub fn locate(&self, c: &Coordinate, geometry: &Geometry) -> Location {
        if geometry.is_empty() || !geometry.envelope().contains_coord(c) {
            return Location::Exterior;
        }
        let mut boundaries = 0usize;
        let mut interior = false;

        for p in geometry.points() {
            if p.equals_2d(c) {
                interior = true;
            }
        }
        for line in geometry.line_strings() {
            match locate_on_line(c, line) {
                Location::Interior => interior = true,
                Location::Boundary => boundaries += 1,
                Location::Exterior => {}
            }
        }
        for poly in geometry.polygons() {
            match locate_in_polygon(c, poly) {
                Location::Interior => interior = true,
                Location::Boundary => boundaries += 1,
                Location::Exterior => {}
            }
        }

        if boundaries % 2 == 1 {
            Location::Boundary
        } else if interior || boundaries > 0 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    /// Location of `c` relative to the union of `polygons`.
    ///
    /// Unlike [`locate`](Self::locate), no boundary counting is done: a
    /// point on any polygon boundary is boundary unless some polygon
    /// contains it in its interior.
    #[must_use]
    pub fn locate_in_area(&self, c: &Coordinate, polygons: &[&Polygon]) -> Location {
        let mut on_boundary = false;
        for poly in polygons {
            match locate_in_polygon(c, poly) {
                Location::Interior => return Location::Interior,
                Location::Boundary => on_boundary = true,
                Location::Exterior => {}
            }
        }
        if on_boundary {
            Location::Boundary
        } else {
            Location::Exterior
        }
    }
}

/// Location of `c` relative to a single polygon.
#[must_use]
pub fn locate_in_polygon(c: &Coordinate, poly: &Polygon) -> Location {
    if poly.is_empty() || !poly.envelope().contains_coord(c) {
        return Location::Exterior;
    }
    match locate_ring_coords(c, poly.exterior().coords()) {
        Location::Interior => {}
        other => return other,
    }
    for hole in poly.interiors() {
        match locate_ring_coords(c, hole.coords()) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

fn locate_ring_coords(c: &Coordinate, ring: &[Coordinate]) -> Location {
    let p = c.xy();
    let mut counter = RayCrossingCounter::new(p);
    for w in ring.windows(2) {
        counter.count_segment(&w[0].xy(), &w[1].xy());
        if counter.is_on_segment() {
            return Location::Boundary;
        }
    }
    counter.location()
}

fn locate_on_line(c: &Coordinate, line: &LineString) -> Location {
    let coords = line.coords();
    if !line.is_closed() {
        if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
            if c.equals_2d(first) || c.equals_2d(last) {
                return Location::Boundary;
            }
        }
    }
    let p = c.xy();
    let on_line = coords.windows(2).any(|w| {
        let ring = [w[0].xy(), w[1].xy(), w[0].xy()];
        locate_in_ring(&p, &ring) == Location::Boundary
    });
    if on_line || (coords.len() == 1 && coords[0].equals_2d(c)) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LinearRing, Point};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn square_with_hole() -> Polygon {
        Polygon::new(
            LinearRing::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LinearRing::from_xy(&[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)])],
        )
    }

    #[test]
    fn polygon_locations() {
        let g = Geometry::Polygon(square_with_hole());
        let loc = PointLocator::new();
        assert_eq!(loc.locate(&c(1.0, 1.0), &g), Location::Interior);
        assert_eq!(loc.locate(&c(5.0, 5.0), &g), Location::Exterior);
        assert_eq!(loc.locate(&c(4.0, 5.0), &g), Location::Boundary);
        assert_eq!(loc.locate(&c(10.0, 3.0), &g), Location::Boundary);
        assert_eq!(loc.locate(&c(11.0, 3.0), &g), Location::Exterior);
    }

    #[test]
    fn adjacent_polygons_share_interior_boundary() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 1.0, 1.0),
            Polygon::rectangle(1.0, 0.0, 2.0, 1.0),
        ]);
        let loc = PointLocator::new();
        assert_eq!(loc.locate(&c(1.0, 0.5), &g), Location::Interior);
        let polys = g.polygons();
        assert_eq!(loc.locate_in_area(&c(1.0, 0.5), &polys), Location::Boundary);
    }

    #[test]
    fn line_boundary_rule() {
        let open = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]));
        let loc = PointLocator::new();
        assert_eq!(loc.locate(&c(0.0, 0.0), &open), Location::Boundary);
        assert_eq!(loc.locate(&c(1.0, 0.0), &open), Location::Interior);
        assert_eq!(loc.locate(&c(2.0, 0.0), &open), Location::Interior);
        assert_eq!(loc.locate(&c(1.0, 1.0), &open), Location::Exterior);

        // Two lines ending at the same point: even count, so interior.
        let joined = Geometry::MultiLineString(vec![
            LineString::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
            LineString::from_xy(&[(1.0, 0.0), (2.0, 0.0)]),
        ]);
        assert_eq!(loc.locate(&c(1.0, 0.0), &joined), Location::Interior);

        let closed =
            Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]));
        assert_eq!(loc.locate(&c(0.0, 0.0), &closed), Location::Interior);
    }

    #[test]
    fn points_are_interior_when_equal() {
        let g = Geometry::MultiPoint(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        let loc = PointLocator::new();
        assert_eq!(loc.locate(&c(2.0, 2.0), &g), Location::Interior);
        assert_eq!(loc.locate(&c(1.5, 1.5), &g), Location::Exterior);
    }
}
