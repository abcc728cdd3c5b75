use tracing::debug;

use super::edge_source::check_finite;
use super::policy::RobustnessPolicy;
use super::robust::{run_ladder, LadderState, OverlayReport};
use super::select::{result_dimension, OverlayOp};
use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;

/// Computes a boolean overlay of two geometries.
///
/// Each call owns its working state; the inputs are only read, and the
/// result never shares storage with them.
pub struct Overlay<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
    op: OverlayOp,
    policy: RobustnessPolicy,
}

impl<'a> Overlay<'a> {
    /// Creates a new `Overlay` operation with the default robustness policy.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry, op: OverlayOp) -> Self {
        Self {
            a,
            b,
            op,
            policy: RobustnessPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RobustnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the overlay.
    ///
    /// # Errors
    ///
    /// Returns a geometry error for non-finite coordinates or mixed
    /// collections, and [`OperationError::RobustnessExhausted`] if no
    /// strategy of the ladder produced a valid result.
    ///
    /// [`OperationError::RobustnessExhausted`]: crate::error::OperationError::RobustnessExhausted
    pub fn execute(&self) -> Result<Geometry> {
        self.execute_with_report().result
    }

    /// Executes the overlay and reports every attempt of the ladder.
    ///
    /// Inputs answered by a shortcut report no attempts and the
    /// [`LadderState::Succeeded`] state; rejected inputs report
    /// [`LadderState::Failed`].
    #[must_use]
    pub fn execute_with_report(&self) -> OverlayReport {
        if let Err(err) = self.check_inputs() {
            return OverlayReport {
                result: Err(err),
                attempts: Vec::new(),
                state: LadderState::Failed,
            };
        }
        if let Some(result) = self.shortcut() {
            debug!(op = %self.op, "overlay answered without a graph");
            return OverlayReport {
                result: Ok(result),
                attempts: Vec::new(),
                state: LadderState::Succeeded,
            };
        }
        run_ladder(self.a, self.b, self.op, &self.policy)
    }

    fn check_inputs(&self) -> Result<()> {
        for g in [self.a, self.b] {
            if !g.is_homogeneous() {
                return Err(GeometryError::MixedCollection.into());
            }
            check_finite(g)?;
        }
        Ok(())
    }

    /// Results that follow from emptiness or envelope disjointness alone.
    fn shortcut(&self) -> Option<Geometry> {
        let (a, b) = (self.a, self.b);
        let empty = || Geometry::empty(result_dimension(self.op, a.dimension(), b.dimension()));
        match self.op {
            OverlayOp::Intersection => {
                let disjoint = !a.envelope().intersects(&b.envelope());
                (a.is_empty() || b.is_empty() || disjoint).then(empty)
            }
            OverlayOp::Difference if a.is_empty() => Some(empty()),
            OverlayOp::Difference if b.is_empty() => Some(a.clone()),
            OverlayOp::Difference => None,
            OverlayOp::Union | OverlayOp::SymDifference => match (a.is_empty(), b.is_empty()) {
                (true, true) => Some(empty()),
                (true, false) => Some(b.clone()),
                (false, true) => Some(a.clone()),
                (false, false) => None,
            },
        }
    }
}

/// Computes `op` on `a` and `b` with the default robustness policy.
///
/// # Errors
///
/// See [`Overlay::execute`].
pub fn overlay(a: &Geometry, b: &Geometry, op: OverlayOp) -> Result<Geometry> {
    Overlay::new(a, b, op).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::OverlayError;
    use crate::geometry::{Dimension, LineString, Point, Polygon};
    use approx::assert_abs_diff_eq;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::rectangle(x0, y0, x1, y1))
    }

    #[test]
    fn empty_inputs_shortcut() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let empty = Geometry::empty(Dimension::Area);

        let report = Overlay::new(&a, &empty, OverlayOp::Intersection).execute_with_report();
        assert!(report.attempts.is_empty());
        assert_eq!(report.state, LadderState::Succeeded);
        assert!(report.result.unwrap().is_empty());

        assert_eq!(overlay(&a, &empty, OverlayOp::Difference).unwrap(), a);
        assert!(overlay(&empty, &a, OverlayOp::Difference).unwrap().is_empty());
        assert_eq!(overlay(&empty, &a, OverlayOp::SymDifference).unwrap(), a);
    }

    #[test]
    fn disjoint_intersection_keeps_the_result_dimension() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = Geometry::LineString(LineString::from_xy(&[(5.0, 5.0), (6.0, 6.0)]));
        let out = overlay(&a, &b, OverlayOp::Intersection).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.dimension(), Dimension::Line);
    }

    #[test]
    fn mixed_collection_is_rejected() {
        let mixed = Geometry::GeometryCollection(vec![
            square(0.0, 0.0, 1.0, 1.0),
            Geometry::Point(Point::new(5.0, 5.0)),
        ]);
        let a = square(0.0, 0.0, 1.0, 1.0);
        let report = Overlay::new(&mixed, &a, OverlayOp::Union).execute_with_report();
        assert_eq!(report.state, LadderState::Failed);
        assert!(matches!(
            report.result,
            Err(OverlayError::Geometry(GeometryError::MixedCollection))
        ));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let a = Geometry::Point(Point::new(f64::NAN, 0.0));
        let b = Geometry::Point(Point::new(0.0, 0.0));
        let err = overlay(&a, &b, OverlayOp::Union).unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn well_conditioned_input_succeeds_directly() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let report = Overlay::new(&a, &b, OverlayOp::SymDifference).execute_with_report();
        assert_eq!(report.state, LadderState::Succeeded);
        assert_eq!(report.attempts.len(), 1);
        assert_abs_diff_eq!(report.result.unwrap().area(), 150.0);
    }
}
