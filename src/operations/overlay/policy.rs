/// Parameters of the robustness ladder.
///
/// The snapping tolerances form the sequence
/// `magnitude * snap_tolerance_factor * snap_growth^k` for
/// `k = 0..snap_attempts`, where `magnitude` is the largest absolute
/// ordinate of the inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustnessPolicy {
    /// Number of snapping attempts after the direct one.
    pub snap_attempts: usize,
    /// First snapping tolerance relative to the coordinate magnitude.
    pub snap_tolerance_factor: f64,
    /// Factor between successive snapping tolerances.
    pub snap_growth: f64,
    /// Whether to finish with a snap-rounded, reduced-precision attempt.
    pub reduced_precision: bool,
    /// Hard cap on the number of attempts.
    pub max_attempts: usize,
    /// Whether each candidate result must pass the validity check.
    pub validate_result: bool,
    /// Whether to clip inputs to the region that can affect the result.
    pub clip_inputs: bool,
}

impl Default for RobustnessPolicy {
    fn default() -> Self {
        Self {
            snap_attempts: 5,
            snap_tolerance_factor: 1e-12,
            snap_growth: 10.0,
            reduced_precision: true,
            max_attempts: 8,
            validate_result: true,
            clip_inputs: true,
        }
    }
}

impl RobustnessPolicy {
    /// Policy running only the direct attempt.
    #[must_use]
    pub fn direct_only() -> Self {
        Self {
            snap_attempts: 0,
            reduced_precision: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_snap_attempts(mut self, snap_attempts: usize) -> Self {
        self.snap_attempts = snap_attempts;
        self
    }

    #[must_use]
    pub fn with_snap_tolerance_factor(mut self, factor: f64) -> Self {
        self.snap_tolerance_factor = factor;
        self
    }

    #[must_use]
    pub fn with_snap_growth(mut self, growth: f64) -> Self {
        self.snap_growth = growth;
        self
    }

    #[must_use]
    pub fn with_reduced_precision(mut self, enabled: bool) -> Self {
        self.reduced_precision = enabled;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_validate_result(mut self, validate: bool) -> Self {
        self.validate_result = validate;
        self
    }

    #[must_use]
    pub fn with_clip_inputs(mut self, clip: bool) -> Self {
        self.clip_inputs = clip;
        self
    }
}
