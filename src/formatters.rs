//! Per-variant formatting rules for turning a parameter's plain value into a display string
//! and back, per the CLAP wrapper contract in spec §4.8: continuous `{:.2}{unit}`, integer as
//! a plain integer, boolean as `On`/`Off`, choice as its label.

use crate::params::declaration::ParamDecl;

/// Round an `f32` value to always have a specific number of decimal digits, e.g.
/// `f32_rounded(2)` renders `0.5` as `"0.50"`.
pub fn f32_rounded(digits: usize) -> impl Fn(f32) -> String {
    move |x| format!("{:.digits$}", x)
}

/// Parse a plain `f32`, trimming any trailing unit text first.
pub fn s2v_f32_unit(unit: &'static str) -> impl Fn(&str) -> Option<f32> {
    move |s| s.trim().trim_end_matches(unit).trim().parse().ok()
}

/// Format a boolean as `On`/`Off`, per the CLAP wrapper's boolean formatting rule.
pub fn v2s_bool_on_off() -> impl Fn(bool) -> String {
    |value| if value { "On".to_string() } else { "Off".to_string() }
}

/// Parse `"on"`/`"off"` (case-insensitive), falling back to whatever `str::parse::<bool>` does.
pub fn s2v_bool_on_off() -> impl Fn(&str) -> Option<bool> {
    |s| {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("on") {
            Some(true)
        } else if trimmed.eq_ignore_ascii_case("off") {
            Some(false)
        } else {
            trimmed.parse().ok()
        }
    }
}

/// Render a parameter's current plain value as a display string, dispatching on its declared
/// variant per the CLAP wrapper contract (spec §4.8).
pub fn value_to_string(decl: &ParamDecl, plain: f32) -> String {
    match decl {
        ParamDecl::Continuous { unit, .. } => {
            format!("{}{}", f32_rounded(2)(plain), unit.unwrap_or(""))
        }
        ParamDecl::Integer { .. } => format!("{}", plain.round() as i32),
        ParamDecl::Boolean { .. } => v2s_bool_on_off()(plain >= 0.5),
        ParamDecl::Choice { labels, .. } => {
            let index = (plain.round() as usize).min(labels.len().saturating_sub(1));
            labels.get(index).copied().unwrap_or("").to_string()
        }
    }
}

/// Parse a display string back into a plain value, dispatching on the parameter's declared
/// variant. Returns `None` if the string does not fit the variant's expected format.
pub fn string_to_value(decl: &ParamDecl, s: &str) -> Option<f32> {
    match decl {
        ParamDecl::Continuous { unit, .. } => s2v_f32_unit(unit.unwrap_or(""))(s),
        ParamDecl::Integer { .. } => s.trim().parse::<i32>().ok().map(|v| v as f32),
        ParamDecl::Boolean { .. } => s2v_bool_on_off()(s).map(|v| if v { 1.0 } else { 0.0 }),
        ParamDecl::Choice { labels, .. } => labels
            .iter()
            .position(|label| label.eq_ignore_ascii_case(s.trim()))
            .map(|index| index as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::declaration::ParamFlags;
    use crate::params::range::FloatRange;
    use crate::params::smoothing::SmoothingStyle;

    #[test]
    fn f32_rounded_formats() {
        let f = f32_rounded(2);
        assert_eq!(f(0.5), "0.50");
        assert_eq!(f(-1.0), "-1.00");
    }

    #[test]
    fn s2v_f32_unit_trims_unit() {
        let f = s2v_f32_unit(" dB");
        assert_eq!(f("-6.0 dB"), Some(-6.0));
        assert_eq!(f("-6.0"), Some(-6.0));
    }

    #[test]
    fn bool_round_trip() {
        let v2s = v2s_bool_on_off();
        let s2v = s2v_bool_on_off();
        assert_eq!(v2s(true), "On");
        assert_eq!(v2s(false), "Off");
        assert_eq!(s2v("on"), Some(true));
        assert_eq!(s2v("OFF"), Some(false));
    }

    fn gain_decl() -> ParamDecl {
        ParamDecl::Continuous {
            name: "Gain",
            id: "gain",
            default: 0.0,
            range: FloatRange::Linear { min: -60.0, max: 24.0 },
            unit: Some(" dB"),
            smoothing: SmoothingStyle::None,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    #[test]
    fn continuous_dispatch_round_trips() {
        let decl = gain_decl();
        assert_eq!(value_to_string(&decl, -6.0), "-6.00 dB");
        assert_eq!(string_to_value(&decl, "-6.00 dB"), Some(-6.0));
    }

    #[test]
    fn choice_dispatch_round_trips() {
        let decl = ParamDecl::Choice {
            name: "Mode",
            id: "mode",
            default_index: 0,
            labels: &["Soft", "Hard"],
            flags: ParamFlags::AUTOMATABLE,
        };
        assert_eq!(value_to_string(&decl, 1.0), "Hard");
        assert_eq!(string_to_value(&decl, "hard"), Some(1.0));
    }

    #[test]
    fn boolean_dispatch_round_trips() {
        let decl = ParamDecl::Boolean {
            name: "Bypass",
            id: "bypass",
            default: false,
            flags: ParamFlags::AUTOMATABLE,
        };
        assert_eq!(value_to_string(&decl, 1.0), "On");
        assert_eq!(string_to_value(&decl, "off"), Some(0.0));
    }
}
