mod coordinate;
mod envelope;
mod line_string;
pub mod locate;
mod point;
mod polygon;
pub mod validate;

pub use coordinate::{CoordKey, Coordinate};
pub use envelope::Envelope;
pub use line_string::{LineString, LinearRing};
pub use locate::PointLocator;
pub use point::Point;
pub use polygon::Polygon;
pub use validate::IsValid;

use std::cmp::Ordering;

/// Topological dimension of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Point = 0,
    Line = 1,
    Area = 2,
}

/// Location of a point relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// A planar geometry.
///
/// The set of kinds is closed; every algorithm in the crate matches on it
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The empty geometry of the given dimension.
    #[must_use]
    pub fn empty(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Point => Self::Point(Point::empty()),
            Dimension::Line => Self::LineString(LineString::empty()),
            Dimension::Area => Self::Polygon(Polygon::empty()),
        }
    }

    /// Builds the simplest geometry holding the given polygons.
    #[must_use]
    pub fn from_polygons(mut polygons: Vec<Polygon>) -> Self {
        match polygons.len() {
            0 => Self::empty(Dimension::Area),
            1 => Self::Polygon(polygons.remove(0)),
            _ => Self::MultiPolygon(polygons),
        }
    }

    /// Builds the simplest geometry holding the given lines.
    #[must_use]
    pub fn from_lines(mut lines: Vec<LineString>) -> Self {
        match lines.len() {
            0 => Self::empty(Dimension::Line),
            1 => Self::LineString(lines.remove(0)),
            _ => Self::MultiLineString(lines),
        }
    }

    /// Builds the simplest geometry holding the given points.
    #[must_use]
    pub fn from_points(mut points: Vec<Coordinate>) -> Self {
        match points.len() {
            0 => Self::empty(Dimension::Point),
            1 => Self::Point(Point::from_coord(points.remove(0))),
            _ => Self::MultiPoint(points.into_iter().map(Point::from_coord).collect()),
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Dimension::Point,
            Self::LineString(_) | Self::MultiLineString(_) => Dimension::Line,
            Self::Polygon(_) | Self::MultiPolygon(_) => Dimension::Area,
            Self::GeometryCollection(children) => children
                .iter()
                .map(Self::dimension)
                .max()
                .unwrap_or(Dimension::Point),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(p) => p.is_empty(),
            Self::LineString(l) => l.is_empty(),
            Self::Polygon(p) => p.is_empty(),
            Self::MultiPoint(ps) => ps.iter().all(Point::is_empty),
            Self::MultiLineString(ls) => ls.iter().all(LineString::is_empty),
            Self::MultiPolygon(ps) => ps.iter().all(Polygon::is_empty),
            Self::GeometryCollection(gs) => gs.iter().all(Self::is_empty),
        }
    }

    /// Returns `false` for collections mixing dimensions among their
    /// non-empty members.
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        match self {
            Self::GeometryCollection(children) => {
                let mut dims = children
                    .iter()
                    .filter(|g| !g.is_empty())
                    .map(|g| (g.is_homogeneous(), g.dimension()));
                match dims.next() {
                    None => true,
                    Some((ok, first)) => ok && dims.all(|(ok, d)| ok && d == first),
                }
            }
            _ => true,
        }
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        self.for_each_coord(&mut |c| env.expand_to_include(c));
        env
    }

    /// Total area of the polygonal members.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygons().iter().map(|p| p.area()).sum()
    }

    /// Total length of lines and polygon rings.
    #[must_use]
    pub fn length(&self) -> f64 {
        let lines: f64 = self.line_strings().iter().map(|l| l.length()).sum();
        let rings: f64 = self
            .polygons()
            .iter()
            .flat_map(|p| p.rings())
            .map(LinearRing::length)
            .sum();
        lines + rings
    }

    #[must_use]
    pub fn num_points(&self) -> usize {
        let mut n = 0;
        self.for_each_coord(&mut |_| n += 1);
        n
    }

    /// Number of non-empty atomic members.
    #[must_use]
    pub fn num_geometries(&self) -> usize {
        self.polygons().len() + self.line_strings().len() + self.points().len()
    }

    /// All non-empty polygons, in order.
    #[must_use]
    pub fn polygons(&self) -> Vec<&Polygon> {
        let mut out = Vec::new();
        self.collect_polygons(&mut out);
        out
    }

    fn collect_polygons<'a>(&'a self, out: &mut Vec<&'a Polygon>) {
        match self {
            Self::Polygon(p) if !p.is_empty() => out.push(p),
            Self::MultiPolygon(ps) => out.extend(ps.iter().filter(|p| !p.is_empty())),
            Self::GeometryCollection(gs) => gs.iter().for_each(|g| g.collect_polygons(out)),
            _ => {}
        }
    }

    /// All non-empty line strings, in order.
    #[must_use]
    pub fn line_strings(&self) -> Vec<&LineString> {
        let mut out = Vec::new();
        self.collect_lines(&mut out);
        out
    }

    fn collect_lines<'a>(&'a self, out: &mut Vec<&'a LineString>) {
        match self {
            Self::LineString(l) if !l.is_empty() => out.push(l),
            Self::MultiLineString(ls) => out.extend(ls.iter().filter(|l| !l.is_empty())),
            Self::GeometryCollection(gs) => gs.iter().for_each(|g| g.collect_lines(out)),
            _ => {}
        }
    }

    /// Coordinates of all non-empty points, in order.
    #[must_use]
    pub fn points(&self) -> Vec<&Coordinate> {
        let mut out = Vec::new();
        self.collect_points(&mut out);
        out
    }

    fn collect_points<'a>(&'a self, out: &mut Vec<&'a Coordinate>) {
        match self {
            Self::Point(p) => out.extend(p.coord()),
            Self::MultiPoint(ps) => out.extend(ps.iter().filter_map(Point::coord)),
            Self::GeometryCollection(gs) => gs.iter().for_each(|g| g.collect_points(out)),
            _ => {}
        }
    }

    /// Visits every vertex.
    pub fn for_each_coord(&self, f: &mut impl FnMut(&Coordinate)) {
        for c in self.points() {
            f(c);
        }
        for l in self.line_strings() {
            l.coords().iter().for_each(&mut *f);
        }
        for p in self.polygons() {
            for ring in p.rings() {
                ring.coords().iter().for_each(&mut *f);
            }
        }
    }

    /// Canonical form for order-insensitive comparison.
    ///
    /// Rings are oriented (shells counter-clockwise, holes clockwise) and
    /// start at their lowest vertex; lines start at their lower end;
    /// members of multi-geometries and collections are sorted.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self {
            Self::Point(p) => Self::Point(*p),
            Self::LineString(l) => Self::LineString(normalize_line(l)),
            Self::Polygon(p) => Self::Polygon(p.normalized()),
            Self::MultiPoint(ps) => {
                let mut ps = ps.clone();
                ps.sort_by(|a, b| compare_opt(a.coord(), b.coord()));
                Self::MultiPoint(ps)
            }
            Self::MultiLineString(ls) => {
                let mut ls: Vec<LineString> = ls.iter().map(normalize_line).collect();
                ls.sort_by(|a, b| compare_opt(a.coords().first(), b.coords().first()));
                Self::MultiLineString(ls)
            }
            Self::MultiPolygon(ps) => {
                let mut ps: Vec<Polygon> = ps.iter().map(Polygon::normalized).collect();
                ps.sort_by(|a, b| {
                    compare_opt(a.exterior().coords().first(), b.exterior().coords().first())
                });
                Self::MultiPolygon(ps)
            }
            Self::GeometryCollection(gs) => {
                let mut gs: Vec<Self> = gs.iter().map(Self::normalized).collect();
                gs.sort_by(|a, b| {
                    a.dimension()
                        .cmp(&b.dimension())
                        .then_with(|| compare_opt(a.first_coord().as_ref(), b.first_coord().as_ref()))
                });
                Self::GeometryCollection(gs)
            }
        }
    }

    fn first_coord(&self) -> Option<Coordinate> {
        let mut first = None;
        self.for_each_coord(&mut |c| {
            if first.is_none() {
                first = Some(*c);
            }
        });
        first
    }
}

fn normalize_line(line: &LineString) -> LineString {
    match (line.coords().first(), line.coords().last()) {
        (Some(first), Some(last)) if last.compare_2d(first) == Ordering::Less => line.reversed(),
        _ => line.clone(),
    }
}

fn compare_opt(a: Option<&Coordinate>, b: Option<&Coordinate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare_2d(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn builders_pick_simplest_kind() {
        assert!(matches!(Geometry::from_polygons(vec![]), Geometry::Polygon(p) if p.is_empty()));
        assert!(matches!(
            Geometry::from_polygons(vec![Polygon::rectangle(0.0, 0.0, 1.0, 1.0)]),
            Geometry::Polygon(_)
        ));
        assert!(matches!(
            Geometry::from_polygons(vec![
                Polygon::rectangle(0.0, 0.0, 1.0, 1.0),
                Polygon::rectangle(2.0, 0.0, 3.0, 1.0)
            ]),
            Geometry::MultiPolygon(ps) if ps.len() == 2
        ));
        assert!(matches!(Geometry::from_points(vec![]), Geometry::Point(p) if p.is_empty()));
    }

    #[test]
    fn collection_homogeneity() {
        let mixed = Geometry::GeometryCollection(vec![
            Geometry::Polygon(Polygon::rectangle(0.0, 0.0, 1.0, 1.0)),
            Geometry::Point(Point::new(5.0, 5.0)),
        ]);
        assert!(!mixed.is_homogeneous());
        assert_eq!(mixed.dimension(), Dimension::Area);

        let same = Geometry::GeometryCollection(vec![
            Geometry::Polygon(Polygon::rectangle(0.0, 0.0, 1.0, 1.0)),
            Geometry::Point(Point::empty()),
        ]);
        assert!(same.is_homogeneous());
    }

    #[test]
    fn measures() {
        let g = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 2.0, 2.0),
            Polygon::rectangle(5.0, 5.0, 6.0, 6.0),
        ]);
        assert_abs_diff_eq!(g.area(), 5.0);
        assert_abs_diff_eq!(g.length(), 12.0);
        assert_eq!(g.num_points(), 10);
        assert_eq!(g.num_geometries(), 2);
        assert_eq!(g.envelope(), Envelope::new(0.0, 0.0, 6.0, 6.0));
    }

    #[test]
    fn normalized_multipolygon_is_order_insensitive() {
        let a = Geometry::MultiPolygon(vec![
            Polygon::rectangle(5.0, 5.0, 6.0, 6.0),
            Polygon::rectangle(0.0, 0.0, 2.0, 2.0),
        ]);
        let b = Geometry::MultiPolygon(vec![
            Polygon::rectangle(0.0, 0.0, 2.0, 2.0),
            Polygon::new(Polygon::rectangle(5.0, 5.0, 6.0, 6.0).exterior().reversed(), vec![]),
        ]);
        assert_eq!(a.normalized(), b.normalized());
    }
}
