//! Parameter declarations: the compile-time, author-facing description of a single parameter
//! (spec §3, §4.1). A declaration is pure data plus pure conversion functions — the atomic
//! runtime storage lives in [`super::store::ParamRuntime`].

use bitflags::bitflags;

use super::range::{FloatRange, IntRange};
use super::smoothing::SmoothingStyle;
use crate::util::fnv1a32;
use crate::zplugin_debug_assert;

bitflags! {
    /// Per-parameter capability flags (spec §3). `AUTOMATABLE` is set by [`ParamFlags::default()`]
    /// since most parameters should be host-automatable unless an author opts out.
    pub struct ParamFlags: u32 {
        const AUTOMATABLE = 1 << 0;
        const MODULATABLE = 1 << 1;
        const HIDDEN = 1 << 2;
        const BYPASS = 1 << 3;
        const STEPPED = 1 << 4;
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        ParamFlags::AUTOMATABLE
    }
}

/// The compile-time description of one parameter. Held in a `&'static [ParamDecl]` returned by
/// an author's `#[derive(Params)]` struct (spec §3a).
#[derive(Debug, Clone, Copy)]
pub enum ParamDecl {
    Continuous {
        name: &'static str,
        id: &'static str,
        default: f32,
        range: FloatRange,
        unit: Option<&'static str>,
        smoothing: SmoothingStyle,
        flags: ParamFlags,
    },
    Integer {
        name: &'static str,
        id: &'static str,
        default: i32,
        range: IntRange,
        flags: ParamFlags,
    },
    Boolean {
        name: &'static str,
        id: &'static str,
        default: bool,
        flags: ParamFlags,
    },
    Choice {
        name: &'static str,
        id: &'static str,
        default_index: usize,
        labels: &'static [&'static str],
        flags: ParamFlags,
    },
}

impl ParamDecl {
    pub const fn name(&self) -> &'static str {
        match self {
            ParamDecl::Continuous { name, .. }
            | ParamDecl::Integer { name, .. }
            | ParamDecl::Boolean { name, .. }
            | ParamDecl::Choice { name, .. } => name,
        }
    }

    pub const fn id(&self) -> &'static str {
        match self {
            ParamDecl::Continuous { id, .. }
            | ParamDecl::Integer { id, .. }
            | ParamDecl::Boolean { id, .. }
            | ParamDecl::Choice { id, .. } => id,
        }
    }

    pub const fn flags(&self) -> ParamFlags {
        match self {
            ParamDecl::Continuous { flags, .. }
            | ParamDecl::Integer { flags, .. }
            | ParamDecl::Boolean { flags, .. }
            | ParamDecl::Choice { flags, .. } => *flags,
        }
    }

    /// The stable wire identity of this parameter (spec §3): FNV-1a/32 of the id string's bytes.
    /// Must never change for a released parameter.
    pub fn id_hash(&self) -> u32 {
        fnv1a32(self.id().as_bytes())
    }

    /// The smoothing style to seed this parameter's [`super::smoothing::Smoother`] with. Only
    /// `Continuous` parameters declare one; every other variant snaps (spec §3: "every
    /// parameter's smoother starts at its default plain value").
    pub fn smoothing_style(&self) -> SmoothingStyle {
        match self {
            ParamDecl::Continuous { smoothing, .. } => *smoothing,
            ParamDecl::Integer { .. } | ParamDecl::Boolean { .. } | ParamDecl::Choice { .. } => {
                SmoothingStyle::None
            }
        }
    }

    /// 0 for continuous, `max - min` for integer, 1 for boolean, `labels.len() - 1` for choice
    /// (spec §4.1).
    pub fn step_count(&self) -> usize {
        match self {
            ParamDecl::Continuous { .. } => 0,
            ParamDecl::Integer { range, .. } => range.step_count(),
            ParamDecl::Boolean { .. } => 1,
            ParamDecl::Choice { labels, .. } => labels.len().saturating_sub(1),
        }
    }

    /// Normalize a plain value, represented as an `f32` regardless of the parameter's native
    /// type (spec §4.1). Integers round to the nearest step; choices round and clamp to a valid
    /// index before dividing by the step count.
    pub fn normalize(&self, plain: f32) -> f32 {
        match self {
            ParamDecl::Continuous { range, .. } => range.normalize(plain),
            ParamDecl::Integer { range, .. } => range.normalize(plain.round() as i32),
            ParamDecl::Boolean { .. } => {
                if plain != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ParamDecl::Choice { .. } => {
                let step_count = self.step_count();
                if step_count == 0 {
                    0.0
                } else {
                    plain.round().clamp(0.0, step_count as f32) / step_count as f32
                }
            }
        }
    }

    /// Unnormalize a `[0, 1]` value back to plain units, represented as `f32`. Integers round
    /// to the nearest step; choices floor to an index (spec §4.1).
    pub fn unnormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        match self {
            ParamDecl::Continuous { range, .. } => range.unnormalize(normalized),
            ParamDecl::Integer { range, .. } => range.unnormalize(normalized) as f32,
            ParamDecl::Boolean { .. } => {
                if normalized >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ParamDecl::Choice { .. } => {
                let step_count = self.step_count();
                (normalized * (step_count.max(1)) as f32).floor().min(step_count as f32)
            }
        }
    }

    /// This parameter's default value, in plain units represented as `f32`.
    pub fn default_plain(&self) -> f32 {
        match self {
            ParamDecl::Continuous { default, .. } => *default,
            ParamDecl::Integer { default, .. } => *default as f32,
            ParamDecl::Boolean { default, .. } => {
                if *default {
                    1.0
                } else {
                    0.0
                }
            }
            ParamDecl::Choice { default_index, .. } => *default_index as f32,
        }
    }

    pub fn default_normalized(&self) -> f32 {
        self.normalize(self.default_plain())
    }

    /// Debug-only validation of the invariants spec §3 requires: defaults within range,
    /// logarithmic ranges strictly positive, choice label lists non-empty.
    pub(crate) fn assert_validity(&self) {
        match self {
            ParamDecl::Continuous { default, range, .. } => {
                range.assert_validity();
                let (min, max) = range.bounds();
                zplugin_debug_assert!(*default >= min && *default <= max, "default out of range");
            }
            ParamDecl::Integer { default, range, .. } => {
                range.assert_validity();
                let IntRange::Linear { min, max } = range;
                zplugin_debug_assert!(default >= min && default <= max, "default out of range");
            }
            ParamDecl::Boolean { .. } => {}
            ParamDecl::Choice {
                default_index,
                labels,
                ..
            } => {
                zplugin_debug_assert!(!labels.is_empty(), "a choice parameter needs at least one label");
                zplugin_debug_assert!(*default_index < labels.len(), "default index out of range");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gain_decl() -> ParamDecl {
        ParamDecl::Continuous {
            name: "Gain",
            id: "gain",
            default: 0.0,
            range: FloatRange::Linear {
                min: -60.0,
                max: 24.0,
            },
            unit: Some(" dB"),
            smoothing: SmoothingStyle::Linear(50.0),
            flags: ParamFlags::default(),
        }
    }

    fn choice_decl() -> ParamDecl {
        ParamDecl::Choice {
            name: "Mode",
            id: "mode",
            default_index: 2,
            labels: &["A", "B", "C", "D"],
            flags: ParamFlags::default(),
        }
    }

    #[test]
    fn id_hash_is_fnv1a32_of_id() {
        assert_eq!(gain_decl().id_hash(), fnv1a32(b"gain"));
    }

    #[test]
    fn continuous_default_normalized() {
        assert_eq!(gain_decl().default_normalized(), FloatRange::Linear { min: -60.0, max: 24.0 }.normalize(0.0));
    }

    #[test]
    fn choice_normalize_unnormalize() {
        let decl = choice_decl();
        assert_eq!(decl.default_normalized(), 2.0 / 3.0);
        assert_eq!(decl.unnormalize(2.0 / 3.0), 2.0);
    }

    #[test]
    fn boolean_normalize() {
        let decl = ParamDecl::Boolean {
            name: "Bypass",
            id: "bypass",
            default: true,
            flags: ParamFlags::default(),
        };
        assert_eq!(decl.default_normalized(), 1.0);
        assert_eq!(decl.unnormalize(0.0), 0.0);
    }

    #[test]
    fn step_counts() {
        assert_eq!(gain_decl().step_count(), 0);
        assert_eq!(choice_decl().step_count(), 3);
        assert_eq!(
            ParamDecl::Integer {
                name: "Voices",
                id: "voices",
                default: 1,
                range: IntRange::Linear { min: 1, max: 16 },
                flags: ParamFlags::default(),
            }
            .step_count(),
            15
        );
    }
}
