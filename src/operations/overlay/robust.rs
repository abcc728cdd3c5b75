use std::fmt;

use tracing::{debug, warn};

use super::engine;
use super::policy::RobustnessPolicy;
use super::select::OverlayOp;
use crate::error::{OperationError, OverlayError, Result};
use crate::geometry::{Coordinate, Envelope, Geometry, IsValid};
use crate::math::precision::{robust_scale, snap_tolerance, PrecisionModel};

/// Precision strategy of one overlay attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Floating-point noding, checked for full noding.
    Direct,
    /// Vertices and intersections snapped within `tolerance`.
    Snapped { tolerance: f64 },
    /// Snap-rounding to a grid of cell size `1 / scale`.
    ReducedPrecision { scale: f64 },
}

impl Strategy {
    /// Precision model applied to computed coordinates.
    #[must_use]
    pub fn precision(&self) -> PrecisionModel {
        match *self {
            Self::Direct | Self::Snapped { .. } => PrecisionModel::Floating,
            Self::ReducedPrecision { scale } => PrecisionModel::fixed(scale),
        }
    }

    /// Snap-rounding guarantees a noded arrangement; the other strategies
    /// have their output checked.
    #[must_use]
    pub fn validates_noding(&self) -> bool {
        !matches!(self, Self::ReducedPrecision { .. })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Snapped { tolerance } => write!(f, "snapped (tolerance {tolerance:e})"),
            Self::ReducedPrecision { scale } => write!(f, "reduced precision (scale {scale})"),
        }
    }
}

/// States of the robustness ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderState {
    Direct,
    /// The `k`-th snapping attempt, counting from zero.
    Snapped(usize),
    ReducedPrecision,
    Failed,
    Succeeded,
}

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Succeeded,
    Failed {
        reason: String,
        location: Option<Coordinate>,
    },
}

/// One attempt of the ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub strategy: Strategy,
    pub outcome: AttemptOutcome,
}

/// Result of an overlay together with how it was obtained.
#[derive(Debug)]
pub struct OverlayReport {
    pub result: Result<Geometry>,
    pub attempts: Vec<Attempt>,
    pub state: LadderState,
}

/// The escalation state machine: direct, then snapped at growing
/// tolerances, then reduced precision, capped at
/// [`RobustnessPolicy::max_attempts`].
#[derive(Debug, Clone)]
pub struct RobustnessLadder {
    policy: RobustnessPolicy,
    base_tolerance: f64,
    scale: f64,
    state: LadderState,
    attempts: usize,
}

impl RobustnessLadder {
    /// Creates a ladder sized for the coordinates of both inputs.
    #[must_use]
    pub fn new(policy: RobustnessPolicy, a: &Geometry, b: &Geometry) -> Self {
        let mut env = a.envelope();
        env.expand_to_include_envelope(&b.envelope());
        let mut coords = Vec::with_capacity(a.num_points() + b.num_points());
        a.for_each_coord(&mut |c| coords.push(*c));
        b.for_each_coord(&mut |c| coords.push(*c));
        Self::with_scale(policy, &env, robust_scale(&coords))
    }

    fn with_scale(policy: RobustnessPolicy, env: &Envelope, scale: f64) -> Self {
        let state = if policy.max_attempts == 0 {
            LadderState::Failed
        } else {
            LadderState::Direct
        };
        Self {
            base_tolerance: snap_tolerance(env, policy.snap_tolerance_factor),
            policy,
            scale,
            state,
            attempts: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> LadderState {
        self.state
    }

    /// Number of attempts finished so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Strategy for the current state, or `None` once the ladder has
    /// terminated.
    #[must_use]
    pub fn strategy(&self) -> Option<Strategy> {
        match self.state {
            LadderState::Direct => Some(Strategy::Direct),
            LadderState::Snapped(k) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let k = k as i32;
                Some(Strategy::Snapped {
                    tolerance: self.base_tolerance * self.policy.snap_growth.powi(k),
                })
            }
            LadderState::ReducedPrecision => Some(Strategy::ReducedPrecision { scale: self.scale }),
            LadderState::Failed | LadderState::Succeeded => None,
        }
    }

    /// Records a successful attempt.
    pub fn succeed(&mut self) {
        self.attempts += 1;
        self.state = LadderState::Succeeded;
    }

    /// Records a failed attempt and moves to the next strategy.
    pub fn escalate(&mut self) {
        self.attempts += 1;
        if self.attempts >= self.policy.max_attempts {
            self.state = LadderState::Failed;
            return;
        }
        let after_snapping = if self.policy.reduced_precision {
            LadderState::ReducedPrecision
        } else {
            LadderState::Failed
        };
        self.state = match self.state {
            LadderState::Direct if self.policy.snap_attempts > 0 => LadderState::Snapped(0),
            LadderState::Snapped(k) if k + 1 < self.policy.snap_attempts => LadderState::Snapped(k + 1),
            LadderState::Direct | LadderState::Snapped(_) => after_snapping,
            LadderState::ReducedPrecision | LadderState::Failed => LadderState::Failed,
            LadderState::Succeeded => LadderState::Succeeded,
        };
    }

    /// Marks the ladder failed without further attempts.
    pub fn abort(&mut self) {
        self.attempts += 1;
        self.state = LadderState::Failed;
    }
}

/// Runs the overlay up the ladder until an attempt yields a valid result.
///
/// Each attempt starts from the inputs; nothing is carried over from a
/// failed one. Degenerate input aborts the ladder with its own error.
pub(crate) fn run_ladder(a: &Geometry, b: &Geometry, op: OverlayOp, policy: &RobustnessPolicy) -> OverlayReport {
    let mut ladder = RobustnessLadder::new(*policy, a, b);
    let mut attempts = Vec::new();
    let mut last: Option<(Strategy, OverlayError)> = None;

    while let Some(strategy) = ladder.strategy() {
        match attempt(a, b, op, strategy, policy) {
            Ok(result) => {
                debug!(%op, %strategy, attempt = ladder.attempts() + 1, "overlay attempt succeeded");
                attempts.push(Attempt {
                    strategy,
                    outcome: AttemptOutcome::Succeeded,
                });
                ladder.succeed();
                return OverlayReport {
                    result: Ok(result),
                    attempts,
                    state: ladder.state(),
                };
            }
            Err(err) => {
                attempts.push(Attempt {
                    strategy,
                    outcome: AttemptOutcome::Failed {
                        reason: err.to_string(),
                        location: err.coordinate(),
                    },
                });
                if !err.is_recoverable() {
                    debug!(%op, %strategy, error = %err, "overlay aborted on degenerate input");
                    ladder.abort();
                    return OverlayReport {
                        result: Err(err),
                        attempts,
                        state: ladder.state(),
                    };
                }
                warn!(%op, %strategy, error = %err, "overlay attempt failed, escalating");
                ladder.escalate();
                last = Some((strategy, err));
            }
        }
    }

    let result = match last {
        Some((last_strategy, source)) => Err(OperationError::RobustnessExhausted {
            last_strategy,
            attempts: ladder.attempts(),
            location: source.coordinate(),
            source: Box::new(source),
        }
        .into()),
        None => Err(OperationError::InvalidResult {
            reason: "no overlay attempt allowed".to_owned(),
            location: None,
        }
        .into()),
    };
    OverlayReport {
        result,
        attempts,
        state: ladder.state(),
    }
}

fn attempt(a: &Geometry, b: &Geometry, op: OverlayOp, strategy: Strategy, policy: &RobustnessPolicy) -> Result<Geometry> {
    let result = engine::run(a, b, op, strategy, policy.clip_inputs)?;
    if policy.validate_result {
        IsValid::new(&result).execute()?;
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ladder(policy: RobustnessPolicy) -> RobustnessLadder {
        RobustnessLadder::with_scale(policy, &Envelope::new(-100.0, 0.0, 10.0, 10.0), 1000.0)
    }

    #[test]
    fn default_ladder_order() {
        let mut ladder = ladder(RobustnessPolicy::default());
        let mut seen = Vec::new();
        while let Some(strategy) = ladder.strategy() {
            seen.push(strategy);
            ladder.escalate();
        }
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[0], Strategy::Direct);
        let Strategy::Snapped { tolerance } = seen[1] else {
            panic!("expected snapping");
        };
        assert_relative_eq!(tolerance, 1e-10);
        let Strategy::Snapped { tolerance } = seen[5] else {
            panic!("expected snapping");
        };
        assert_relative_eq!(tolerance, 1e-6);
        assert_eq!(seen[6], Strategy::ReducedPrecision { scale: 1000.0 });
        assert_eq!(ladder.state(), LadderState::Failed);
        assert_eq!(ladder.attempts(), 7);
    }

    #[test]
    fn hard_cap_stops_the_ladder() {
        let mut ladder = ladder(RobustnessPolicy::default().with_snap_attempts(20).with_max_attempts(3));
        let mut count = 0;
        while ladder.strategy().is_some() {
            count += 1;
            ladder.escalate();
        }
        assert_eq!(count, 3);
        assert_eq!(ladder.state(), LadderState::Failed);
    }

    #[test]
    fn success_ends_the_ladder() {
        let mut ladder = ladder(RobustnessPolicy::default());
        ladder.escalate();
        assert_eq!(ladder.state(), LadderState::Snapped(0));
        ladder.succeed();
        assert_eq!(ladder.state(), LadderState::Succeeded);
        assert!(ladder.strategy().is_none());
    }

    #[test]
    fn without_snapping_or_rounding_only_direct_runs() {
        let mut ladder = ladder(RobustnessPolicy::direct_only());
        assert_eq!(ladder.strategy(), Some(Strategy::Direct));
        ladder.escalate();
        assert_eq!(ladder.state(), LadderState::Failed);
    }

    #[test]
    fn zero_attempts_never_runs() {
        let ladder = ladder(RobustnessPolicy::default().with_max_attempts(0));
        assert!(ladder.strategy().is_none());
    }

    #[test]
    fn strategy_display() {
        assert_eq!(Strategy::Direct.to_string(), "direct");
        assert_eq!(
            Strategy::ReducedPrecision { scale: 100.0 }.to_string(),
            "reduced precision (scale 100)"
        );
    }
}
