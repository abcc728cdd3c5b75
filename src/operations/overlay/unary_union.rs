use std::collections::HashSet;

use tracing::debug;

use super::edge_source::check_finite;
use super::overlay_op::Overlay;
use super::policy::RobustnessPolicy;
use super::select::OverlayOp;
use crate::error::Result;
use crate::geometry::{Coordinate, Dimension, Geometry};

/// Unions a list of geometries into one.
///
/// Polygons and lines are each combined by a balanced tree of pairwise
/// unions, so every overlay sees inputs of similar size. The linework is
/// then unioned with the polygons and the points with everything else.
pub struct UnaryUnion<'a> {
    geometries: &'a [Geometry],
    policy: RobustnessPolicy,
}

impl<'a> UnaryUnion<'a> {
    /// Creates a new `UnaryUnion` operation with the default robustness policy.
    #[must_use]
    pub fn new(geometries: &'a [Geometry]) -> Self {
        Self {
            geometries,
            policy: RobustnessPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RobustnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the union. Collections among the inputs are flattened.
    ///
    /// # Errors
    ///
    /// Returns an error if an input has non-finite coordinates or one of
    /// the pairwise overlays fails.
    pub fn execute(&self) -> Result<Geometry> {
        for g in self.geometries {
            check_finite(g)?;
        }
        let polygons = self
            .geometries
            .iter()
            .flat_map(Geometry::polygons)
            .map(|p| Geometry::Polygon(p.clone()))
            .collect();
        let lines = self
            .geometries
            .iter()
            .flat_map(Geometry::line_strings)
            .map(|l| Geometry::LineString(l.clone()))
            .collect();
        let mut seen = HashSet::new();
        let points: Vec<Coordinate> = self
            .geometries
            .iter()
            .flat_map(Geometry::points)
            .filter(|c| seen.insert(c.key()))
            .copied()
            .collect();
        debug!(inputs = self.geometries.len(), points = points.len(), "unary union");

        let polygonal = self.cascade(polygons)?;
        let lineal = self.cascade(lines)?;
        let mut result = match (polygonal, lineal) {
            (Some(p), Some(l)) => Some(self.union_pair(&p, &l)?),
            (p, l) => p.or(l),
        };
        if !points.is_empty() {
            let puntal = Geometry::from_points(points);
            result = Some(match result {
                Some(rest) => self.union_pair(&rest, &puntal)?,
                None => puntal,
            });
        }

        Ok(result.unwrap_or_else(|| {
            let dim = self
                .geometries
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(Dimension::Point);
            Geometry::empty(dim)
        }))
    }

    /// Unions `parts` level by level, pairing neighbours in envelope order.
    fn cascade(&self, mut parts: Vec<Geometry>) -> Result<Option<Geometry>> {
        parts.sort_by(|a, b| {
            let (ea, eb) = (a.envelope(), b.envelope());
            (ea.min_x + ea.max_x).total_cmp(&(eb.min_x + eb.max_x))
        });
        while parts.len() > 1 {
            let mut next = Vec::with_capacity(parts.len().div_ceil(2));
            let mut iter = parts.into_iter();
            while let Some(first) = iter.next() {
                match iter.next() {
                    Some(second) => next.push(self.union_pair(&first, &second)?),
                    None => next.push(first),
                }
            }
            parts = next;
        }
        Ok(parts.pop())
    }

    fn union_pair(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        Overlay::new(a, b, OverlayOp::Union)
            .with_policy(self.policy)
            .execute()
    }
}

/// Unions all `geometries` with the default robustness policy.
///
/// # Errors
///
/// See [`UnaryUnion::execute`].
pub fn union(geometries: &[Geometry]) -> Result<Geometry> {
    UnaryUnion::new(geometries).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Point, Polygon};
    use approx::assert_abs_diff_eq;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::rectangle(x0, y0, x1, y1))
    }

    #[test]
    fn overlapping_squares_merge() {
        let squares: Vec<Geometry> = (0..5)
            .map(|i| {
                let x = f64::from(i) * 5.0;
                square(x, 0.0, x + 10.0, 10.0)
            })
            .collect();
        let out = union(&squares).unwrap();
        assert!(matches!(out, Geometry::Polygon(_)));
        assert_abs_diff_eq!(out.area(), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_squares_stay_separate() {
        let squares = [
            square(0.0, 0.0, 1.0, 1.0),
            square(5.0, 0.0, 6.0, 1.0),
            square(10.0, 0.0, 11.0, 1.0),
        ];
        let out = union(&squares).unwrap();
        assert_eq!(out.num_geometries(), 3);
        assert_abs_diff_eq!(out.area(), 3.0);
    }

    #[test]
    fn lines_and_points_are_absorbed_by_polygons() {
        let inputs = [
            square(0.0, 0.0, 10.0, 10.0),
            Geometry::LineString(LineString::from_xy(&[(2.0, 2.0), (8.0, 8.0)])),
            Geometry::Point(Point::new(5.0, 5.0)),
            Geometry::Point(Point::new(20.0, 20.0)),
            Geometry::Point(Point::new(20.0, 20.0)),
        ];
        let out = union(&inputs).unwrap();
        let Geometry::GeometryCollection(parts) = out else {
            panic!("expected a collection");
        };
        assert_eq!(parts.len(), 2);
        assert_abs_diff_eq!(parts[0].area(), 100.0);
        assert_eq!(parts[1], Geometry::Point(Point::new(20.0, 20.0)));
    }

    #[test]
    fn crossing_lines_are_noded() {
        let inputs = [
            Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (2.0, 2.0)])),
            Geometry::LineString(LineString::from_xy(&[(0.0, 2.0), (2.0, 0.0)])),
        ];
        let out = union(&inputs).unwrap();
        assert_eq!(out.num_geometries(), 4);
        assert_abs_diff_eq!(out.length(), 4.0 * 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let out = union(&[]).unwrap();
        assert!(out.is_empty());
        let out = union(&[Geometry::empty(Dimension::Area)]).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.dimension(), Dimension::Area);
    }
}
