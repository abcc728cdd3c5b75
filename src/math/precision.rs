use crate::geometry::{Coordinate, Envelope};

/// Significant decimal digits a double can carry through noding without
/// losing robustness.
const MAX_ROBUST_DP_DIGITS: i32 = 14;

/// Coordinate precision applied to computed vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double precision.
    #[default]
    Floating,
    /// Coordinates are rounded to a grid of cell size `1 / scale`.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    #[must_use]
    pub fn fixed(scale: f64) -> Self {
        Self::Fixed { scale }
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    /// Size of a grid cell, or zero for floating precision.
    #[must_use]
    pub fn grid_size(&self) -> f64 {
        match *self {
            Self::Floating => 0.0,
            Self::Fixed { scale } => 1.0 / scale,
        }
    }

    /// Rounds an ordinate value to the model's grid.
    #[must_use]
    pub fn make_precise(&self, value: f64) -> f64 {
        match *self {
            Self::Floating => value,
            Self::Fixed { scale } => (value * scale).round() / scale,
        }
    }

    /// Rounds the planar position of `c`, keeping z and m.
    #[must_use]
    pub fn make_precise_coord(&self, c: &Coordinate) -> Coordinate {
        Coordinate {
            x: self.make_precise(c.x),
            y: self.make_precise(c.y),
            ..*c
        }
    }
}

/// Largest power-of-ten scale that keeps [`MAX_ROBUST_DP_DIGITS`]
/// significant digits for values up to `magnitude`.
#[must_use]
pub fn safe_scale(magnitude: f64) -> f64 {
    let magnitude = magnitude.abs();
    #[allow(clippy::cast_possible_truncation)]
    let digits = if magnitude > 0.0 {
        (magnitude.log10() + 1.0).floor() as i32
    } else {
        1
    };
    10f64.powi(MAX_ROBUST_DP_DIGITS - digits)
}

/// Scale implied by the number of decimals in the shortest round-trip
/// representation of `value`.
#[must_use]
pub fn inherent_scale(value: f64) -> f64 {
    let repr = value.to_string();
    let decimals = repr
        .split_once('.')
        .map_or(0, |(_, frac)| frac.len().min(300));
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let decimals = decimals as i32;
    10f64.powi(decimals)
}

/// Scale used for the reduced-precision attempt.
///
/// The inputs' inherent decimal scale if it is safe, otherwise the safe
/// scale for their magnitude.
pub fn robust_scale<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> f64 {
    let mut inherent: f64 = 1.0;
    let mut env = Envelope::empty();
    for c in coords {
        inherent = inherent.max(inherent_scale(c.x)).max(inherent_scale(c.y));
        env.expand_to_include(c);
    }
    let safe = safe_scale(env.max_magnitude());
    if inherent <= safe {
        inherent
    } else {
        safe
    }
}

/// Base snapping tolerance for inputs spanning `env`.
#[must_use]
pub fn snap_tolerance(env: &Envelope, factor: f64) -> f64 {
    let magnitude = env.max_magnitude();
    if magnitude > 0.0 {
        magnitude * factor
    } else {
        factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fixed_model_rounds_to_grid() {
        let pm = PrecisionModel::fixed(10.0);
        assert_relative_eq!(pm.make_precise(1.23), 1.2);
        assert_relative_eq!(pm.make_precise(-1.26), -1.3);
        assert_relative_eq!(pm.grid_size(), 0.1);
        let c = pm.make_precise_coord(&Coordinate::new_xyzm(0.04, 0.06, 7.0, 8.0));
        assert_relative_eq!(c.x, 0.0);
        assert_relative_eq!(c.y, 0.1);
        assert_eq!(c.z, Some(7.0));
    }

    #[test]
    fn floating_model_is_identity() {
        let pm = PrecisionModel::default();
        assert!(pm.is_floating());
        assert_relative_eq!(pm.make_precise(1.234_567_891), 1.234_567_891);
    }

    #[test]
    fn scales() {
        assert_relative_eq!(inherent_scale(12.0), 1.0);
        assert_relative_eq!(inherent_scale(1.25), 100.0);
        assert_relative_eq!(safe_scale(100.0), 1e11);
        assert_relative_eq!(safe_scale(0.5), 1e14);
    }

    #[test]
    fn robust_scale_prefers_inherent_when_safe() {
        let coords = [Coordinate::new(1.5, 2.25), Coordinate::new(10.0, 0.0)];
        assert_relative_eq!(robust_scale(&coords), 100.0);

        let noisy = [Coordinate::new(1000.123_456_789_012_3, 0.0)];
        assert_relative_eq!(robust_scale(&noisy), 1e10);
    }

    #[test]
    fn snap_tolerance_tracks_magnitude() {
        let env = Envelope::new(-50.0, 0.0, 200.0, 10.0);
        assert_relative_eq!(snap_tolerance(&env, 1e-12), 2e-10);
    }
}
