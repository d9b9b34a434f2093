//! Ranges for continuous and integer parameters.

use crate::zplugin_debug_assert;

/// A distribution for a continuous parameter's range. Both endpoints are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatRange {
    /// Values are uniformly distributed between `min` and `max`.
    Linear { min: f32, max: f32 },
    /// Values are distributed logarithmically between `min` and `max`. Both endpoints must be
    /// strictly positive; this is checked by [`FloatRange::assert_validity`].
    Logarithmic { min: f32, max: f32 },
}

/// A distribution for an integer parameter's range. Both endpoints are inclusive. Only linear
/// ranges are supported since hosts expect discrete parameters to have a fixed step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntRange {
    Linear { min: i32, max: i32 },
}

impl FloatRange {
    /// Normalize a plain value into `[0, 1]`, clamping it to the range first.
    ///
    /// A degenerate range (`min == max`) always normalizes to `0.0`.
    pub fn normalize(&self, plain: f32) -> f32 {
        match self {
            FloatRange::Linear { min, max } => {
                if min == max {
                    return 0.0;
                }
                (plain.clamp(*min, *max) - min) / (max - min)
            }
            FloatRange::Logarithmic { min, max } => {
                if min == max {
                    return 0.0;
                }
                let plain = plain.clamp(*min, *max);
                (plain.ln() - min.ln()) / (max.ln() - min.ln())
            }
        }
    }

    /// Unnormalize a `[0, 1]` value (clamped first) back into the range's plain units.
    ///
    /// A degenerate range (`min == max`) always unnormalizes to `min`.
    pub fn unnormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        match self {
            FloatRange::Linear { min, max } => {
                if min == max {
                    return *min;
                }
                (normalized * (max - min)) + min
            }
            FloatRange::Logarithmic { min, max } => {
                if min == max {
                    return *min;
                }
                (min.ln() + normalized * (max.ln() - min.ln())).exp()
            }
        }
    }

    /// The range's bounds, regardless of variant.
    pub fn bounds(&self) -> (f32, f32) {
        match self {
            FloatRange::Linear { min, max } => (*min, *max),
            FloatRange::Logarithmic { min, max } => (*min, *max),
        }
    }

    /// Debug-only validation: linear ranges need `min <= max`, logarithmic ranges additionally
    /// need both endpoints strictly positive (spec §3).
    pub(crate) fn assert_validity(&self) {
        match self {
            FloatRange::Linear { min, max } => {
                zplugin_debug_assert!(min <= max, "range minimum must not exceed the maximum");
            }
            FloatRange::Logarithmic { min, max } => {
                zplugin_debug_assert!(min <= max, "range minimum must not exceed the maximum");
                zplugin_debug_assert!(*min > 0.0 && *max > 0.0, "logarithmic range endpoints must be strictly positive");
            }
        }
    }
}

impl IntRange {
    /// Normalize a plain value into `[0, 1]`, clamping it to the range first.
    pub fn normalize(&self, plain: i32) -> f32 {
        let IntRange::Linear { min, max } = self;
        if min == max {
            return 0.0;
        }
        ((plain.clamp(*min, *max) - min) as f32 / (max - min) as f32).clamp(0.0, 1.0)
    }

    /// Unnormalize a `[0, 1]` value (clamped first), rounding to the nearest integer.
    pub fn unnormalize(&self, normalized: f32) -> i32 {
        let IntRange::Linear { min, max } = self;
        if min == max {
            return *min;
        }
        let normalized = normalized.clamp(0.0, 1.0);
        (normalized * (max - min) as f32).round() as i32 + min
    }

    /// The number of discrete steps in this range, used for the host's generic UI.
    pub fn step_count(&self) -> usize {
        let IntRange::Linear { min, max } = self;
        (max - min) as usize
    }

    pub(crate) fn assert_validity(&self) {
        let IntRange::Linear { min, max } = self;
        zplugin_debug_assert!(min <= max, "range minimum must not exceed the maximum");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: FloatRange = FloatRange::Linear { min: 10.0, max: 20.0 };
    const LOG: FloatRange = FloatRange::Logarithmic { min: 20.0, max: 20_000.0 };
    const INT: IntRange = IntRange::Linear { min: -10, max: 10 };

    #[test]
    fn linear_normalize_unnormalize() {
        assert_eq!(LINEAR.normalize(17.5), 0.75);
        assert_eq!(LINEAR.unnormalize(0.25), 12.5);
    }

    #[test]
    fn linear_endpoints_map_to_0_and_1() {
        assert_eq!(LINEAR.normalize(10.0), 0.0);
        assert_eq!(LINEAR.normalize(20.0), 1.0);
    }

    #[test]
    fn linear_clamps_out_of_range_input() {
        assert_eq!(LINEAR.normalize(100.0), 1.0);
        assert_eq!(LINEAR.normalize(-100.0), 0.0);
    }

    #[test]
    fn linear_degenerate_range() {
        let degenerate = FloatRange::Linear { min: 5.0, max: 5.0 };
        assert_eq!(degenerate.normalize(5.0), 0.0);
        assert_eq!(degenerate.unnormalize(0.5), 5.0);
    }

    #[test]
    fn logarithmic_round_trip() {
        let normalized = LOG.normalize(2_000.0);
        let plain = LOG.unnormalize(normalized);
        assert!((plain - 2_000.0).abs() / 2_000.0 < 1e-3);
    }

    #[test]
    fn logarithmic_endpoints_map_to_0_and_1() {
        assert_eq!(LOG.normalize(20.0), 0.0);
        assert!((LOG.normalize(20_000.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn int_normalize_unnormalize() {
        assert_eq!(INT.normalize(-5), 0.25);
        assert_eq!(INT.unnormalize(0.75), 5);
    }

    #[test]
    fn int_unnormalize_rounds_to_nearest() {
        assert_eq!(INT.unnormalize(0.73), 5);
    }

    #[test]
    fn int_step_count() {
        assert_eq!(INT.step_count(), 20);
    }
}
