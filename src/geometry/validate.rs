use super::locate::locate_in_polygon;
use super::{Coordinate, Envelope, Geometry, LinearRing, Location, Polygon};
use crate::error::{OperationError, OverlayError, Result};
use crate::index::SegmentIndex;
use crate::math::intersect_2d::{segment_intersection, SegmentIntersection};
use crate::math::polygon_2d::locate_in_ring;
use crate::math::Point2;

/// Validates the planar consistency of a geometry.
///
/// Checks finite coordinates, ring closure and size, ring self-crossings
/// and self-touches, overlapping segments, holes outside their shell,
/// nested holes and overlapping polygons of a multipolygon. The first
/// problem found is reported.
pub struct IsValid<'a> {
    geometry: &'a Geometry,
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        Self { geometry }
    }

    /// Returns `true` if the geometry is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.execute().is_ok()
    }

    /// Executes the validation.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidResult`] describing the first
    /// problem found and where it is.
    pub fn execute(&self) -> Result<()> {
        check_geometry(self.geometry)
    }
}

fn invalid(reason: &str, at: Option<Coordinate>) -> OverlayError {
    OperationError::InvalidResult {
        reason: reason.to_owned(),
        location: at,
    }
    .into()
}

fn check_geometry(geometry: &Geometry) -> Result<()> {
    let mut non_finite = None;
    geometry.for_each_coord(&mut |c| {
        if non_finite.is_none() && !c.is_finite() {
            non_finite = Some(*c);
        }
    });
    if let Some(c) = non_finite {
        return Err(invalid("non-finite coordinate", Some(c)));
    }

    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Ok(()),
        Geometry::LineString(_) | Geometry::MultiLineString(_) => {
            for line in geometry.line_strings() {
                let coords = line.coords();
                if coords.iter().all(|c| c.equals_2d(&coords[0])) {
                    return Err(invalid("line has fewer than 2 distinct points", coords.first().copied()));
                }
            }
            Ok(())
        }
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => check_polygons(&geometry.polygons()),
        Geometry::GeometryCollection(children) => children.iter().try_for_each(check_geometry),
    }
}

/// A ring segment with its position in the polygon set.
struct RingSegment {
    polygon: usize,
    ring: usize,
    index: usize,
    ring_len: usize,
    a: Coordinate,
    b: Coordinate,
}

impl RingSegment {
    fn is_adjacent(&self, other: &Self) -> bool {
        if self.polygon != other.polygon || self.ring != other.ring {
            return false;
        }
        let (i, j) = (self.index.min(other.index), self.index.max(other.index));
        j == i + 1 || (i == 0 && j + 1 == self.ring_len)
    }
}

fn check_polygons(polygons: &[&Polygon]) -> Result<()> {
    for poly in polygons {
        for ring in poly.rings() {
            check_ring_structure(ring)?;
        }
    }

    let segments = collect_segments(polygons);
    check_segment_intersections(&segments)?;

    for poly in polygons {
        check_holes(poly)?;
    }
    check_nested_shells(polygons)
}

fn check_ring_structure(ring: &LinearRing) -> Result<()> {
    let coords = ring.coords();
    if coords.len() < 4 {
        return Err(invalid("ring has fewer than 4 points", coords.first().copied()));
    }
    let (first, last) = (coords[0], coords[coords.len() - 1]);
    if !first.equals_2d(&last) {
        return Err(invalid("ring is not closed", Some(first)));
    }
    let mut distinct = 1;
    for w in coords.windows(2) {
        if !w[0].equals_2d(&w[1]) {
            distinct += 1;
        }
    }
    // The closing vertex repeats the first one.
    if distinct - 1 < 3 {
        return Err(invalid("ring collapses to fewer than 3 distinct points", Some(first)));
    }
    Ok(())
}

fn collect_segments(polygons: &[&Polygon]) -> Vec<RingSegment> {
    let mut segments = Vec::new();
    for (pi, poly) in polygons.iter().enumerate() {
        for (ri, ring) in poly.rings().enumerate() {
            let coords: Vec<Coordinate> = dedup(ring.coords());
            let ring_len = coords.len().saturating_sub(1);
            for (si, w) in coords.windows(2).enumerate() {
                segments.push(RingSegment {
                    polygon: pi,
                    ring: ri,
                    index: si,
                    ring_len,
                    a: w[0],
                    b: w[1],
                });
            }
        }
    }
    segments
}

fn dedup(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut out: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for c in coords {
        if out.last().is_none_or(|last| !last.equals_2d(c)) {
            out.push(*c);
        }
    }
    out
}

fn check_segment_intersections(segments: &[RingSegment]) -> Result<()> {
    let envelopes: Vec<Envelope> = segments
        .iter()
        .map(|s| Envelope::of_segment(&s.a, &s.b))
        .collect();
    let index = SegmentIndex::new(&envelopes)?;

    for (i, s) in segments.iter().enumerate() {
        for j in index.query(&envelopes[i]) {
            if j <= i {
                continue;
            }
            let t = &segments[j];
            match segment_intersection(&s.a.xy(), &s.b.xy(), &t.a.xy(), &t.b.xy()) {
                SegmentIntersection::None => {}
                SegmentIntersection::Collinear { start, end } => {
                    if start != end {
                        return Err(invalid("overlapping segments", Some(start.into())));
                    }
                    check_touch(s, t, start.into())?;
                }
                SegmentIntersection::Point { point, proper } => {
                    if proper {
                        return Err(invalid("self-intersection", Some(point.into())));
                    }
                    check_touch(s, t, point.into())?;
                }
            }
        }
    }
    Ok(())
}

/// Two segments meet at a single non-proper point.
fn check_touch(s: &RingSegment, t: &RingSegment, at: Coordinate) -> Result<()> {
    if s.is_adjacent(t) {
        let shared = [s.a, s.b].iter().any(|c| c.equals_2d(&t.a) || c.equals_2d(&t.b));
        if shared {
            return Ok(());
        }
    }
    if s.polygon == t.polygon && s.ring == t.ring {
        return Err(invalid("ring self-intersection", Some(at)));
    }
    // A vertex of one ring in the interior of a segment of another ring is
    // only a touch if the rings do not cross there, which the overlap and
    // containment checks cover.
    Ok(())
}

fn check_holes(poly: &Polygon) -> Result<()> {
    let shell = poly.exterior().points();
    for hole in poly.interiors() {
        if let Some((loc, at)) = first_off_boundary(hole, &shell) {
            if loc == Location::Exterior {
                return Err(invalid("hole lies outside shell", Some(at)));
            }
        }
    }
    let holes: Vec<Vec<_>> = poly.interiors().iter().map(LinearRing::points).collect();
    for (i, hole) in poly.interiors().iter().enumerate() {
        for (j, other) in holes.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some((Location::Interior, at)) = first_off_boundary(hole, other) {
                return Err(invalid("nested holes", Some(at)));
            }
        }
    }
    Ok(())
}

/// Location of the first vertex (or segment midpoint) of `ring` that is
/// not on the boundary of `target`.
fn first_off_boundary(ring: &LinearRing, target: &[Point2]) -> Option<(Location, Coordinate)> {
    let coords = ring.coords();
    for c in coords {
        let loc = locate_in_ring(&c.xy(), target);
        if loc != Location::Boundary {
            return Some((loc, *c));
        }
    }
    for w in coords.windows(2) {
        let mid = Coordinate::new((w[0].x + w[1].x) * 0.5, (w[0].y + w[1].y) * 0.5);
        let loc = locate_in_ring(&mid.xy(), target);
        if loc != Location::Boundary {
            return Some((loc, mid));
        }
    }
    None
}

fn check_nested_shells(polygons: &[&Polygon]) -> Result<()> {
    for (i, a) in polygons.iter().enumerate() {
        for (j, b) in polygons.iter().enumerate() {
            if i == j || !a.envelope().intersects(&b.envelope()) {
                continue;
            }
            let shell = a.exterior().coords();
            let first_off = shell
                .iter()
                .map(|c| (locate_in_polygon(c, b), *c))
                .find(|(loc, _)| *loc != Location::Boundary);
            if let Some((Location::Interior, at)) = first_off {
                return Err(invalid("overlapping polygons", Some(at)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Point};

    fn poly(shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> Polygon {
        Polygon::new(
            LinearRing::from_xy(shell),
            holes.iter().map(|h| LinearRing::from_xy(h)).collect(),
        )
    }

    #[test]
    fn simple_polygon_with_hole_is_valid() {
        let g = Geometry::Polygon(poly(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]],
        ));
        assert!(IsValid::new(&g).is_valid());
    }

    #[test]
    fn bow_tie_is_invalid() {
        let g = Geometry::Polygon(poly(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)], &[]));
        let err = IsValid::new(&g).execute().unwrap_err();
        assert!(err.to_string().contains("self-intersection"));
        let at = err.coordinate().unwrap();
        assert!((at.x - 1.0).abs() < 1e-12 && (at.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hole_outside_shell_is_invalid() {
        let g = Geometry::Polygon(poly(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[&[(20.0, 2.0), (20.0, 4.0), (24.0, 4.0), (24.0, 2.0)]],
        ));
        assert!(!IsValid::new(&g).is_valid());
    }

    #[test]
    fn nested_holes_are_invalid() {
        let g = Geometry::Polygon(poly(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[
                &[(1.0, 1.0), (1.0, 9.0), (9.0, 9.0), (9.0, 1.0)],
                &[(3.0, 3.0), (3.0, 5.0), (5.0, 5.0), (5.0, 3.0)],
            ],
        ));
        assert!(!IsValid::new(&g).is_valid());
    }

    #[test]
    fn overlapping_multipolygon_is_invalid() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
            Polygon::rectangle(2.0, 2.0, 4.0, 4.0),
        ]);
        assert!(!IsValid::new(&g).is_valid());

        let crossing = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 10.0, 10.0),
            Polygon::rectangle(5.0, 5.0, 15.0, 15.0),
        ]);
        assert!(!IsValid::new(&crossing).is_valid());
    }

    #[test]
    fn multipolygon_touching_at_vertex_is_valid() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 1.0, 1.0),
            Polygon::rectangle(1.0, 1.0, 2.0, 2.0),
        ]);
        assert!(IsValid::new(&g).is_valid());
    }

    #[test]
    fn shared_edge_between_polygons_is_invalid() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 1.0, 1.0),
            Polygon::rectangle(1.0, 0.0, 2.0, 1.0),
        ]);
        assert!(!IsValid::new(&g).is_valid());
    }

    #[test]
    fn collapsed_ring_is_invalid() {
        let g = Geometry::Polygon(poly(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (1.0, 0.0)], &[]));
        assert!(!IsValid::new(&g).is_valid());
    }

    #[test]
    fn lines_and_points() {
        let line = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (0.0, 0.0)]));
        assert!(!IsValid::new(&line).is_valid());
        let nan = Geometry::Point(Point::new(f64::NAN, 0.0));
        assert!(!IsValid::new(&nan).is_valid());
        assert!(IsValid::new(&Geometry::Point(Point::empty())).is_valid());
    }
}
