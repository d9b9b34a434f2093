//! End-to-end scenarios from the parameter and smoothing invariants: gain-unity and a linear
//! smoother's ramp, exercised against the public API the way a wrapper would drive it.

use zplugin::params::declaration::{ParamDecl, ParamFlags};
use zplugin::params::range::FloatRange;
use zplugin::params::smoothing::SmoothingStyle;
use zplugin::params::ParamRuntime;
use zplugin::util::db_to_gain;

static GAIN_DECLS: &[ParamDecl] = &[ParamDecl::Continuous {
    name: "Gain",
    id: "gain",
    default: 0.0,
    range: FloatRange::Linear { min: -30.0, max: 30.0 },
    unit: Some(" dB"),
    smoothing: SmoothingStyle::None,
    flags: ParamFlags::AUTOMATABLE,
}];

static SMOOTHED_GAIN_DECLS: &[ParamDecl] = &[ParamDecl::Continuous {
    name: "Gain",
    id: "gain",
    default: 0.0,
    range: FloatRange::Linear { min: -30.0, max: 30.0 },
    unit: Some(" dB"),
    smoothing: SmoothingStyle::Linear(10.0),
    flags: ParamFlags::AUTOMATABLE,
}];

#[test]
fn gain_at_zero_db_is_unity() {
    let params = ParamRuntime::new(GAIN_DECLS);
    assert_eq!(params.get_float(0), 0.0);
    assert_eq!(db_to_gain(params.get_float(0)), 1.0);
}

#[test]
fn gain_unity_survives_a_round_trip_through_normalized() {
    let params = ParamRuntime::new(GAIN_DECLS);
    params.set_normalized(0, params.normalized(0), 44_100.0);
    assert_eq!(db_to_gain(params.get_float(0)), 1.0);
}

#[test]
fn linear_smoother_ramps_monotonically_to_its_target() {
    // 10ms at 1000 Hz is 10 samples: an exact, easy-to-reason-about step count.
    let params = ParamRuntime::new(SMOOTHED_GAIN_DECLS);
    params.set_normalized(0, 1.0, 1000.0);

    let mut previous = params.get_float(0);
    assert_eq!(previous, 0.0);

    for _ in 0..10 {
        let next = params.next_smoothed(0);
        assert!(next >= previous, "smoother must not overshoot and settle back down");
        previous = next;
    }

    assert_eq!(previous, 30.0, "after its full duration the smoother must land exactly on target");

    // Further calls hold steady at the target instead of continuing to ramp.
    for _ in 0..5 {
        assert_eq!(params.next_smoothed(0), 30.0);
    }
}

#[test]
fn reset_smoothers_on_reactivation_discards_in_flight_ramp() {
    let params = ParamRuntime::new(SMOOTHED_GAIN_DECLS);
    params.set_normalized(0, 1.0, 1000.0);
    params.next_smoothed(0);
    params.next_smoothed(0);

    params.reset_smoothers();

    assert_eq!(params.get_float(0), 30.0, "reset must snap to the parameter's current value, not its pre-ramp one");
}
