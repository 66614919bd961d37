use crate::{AXIS_MAX, AXIS_MIN, Controls, Direction, clamp_axis};

/// **VALUE**: Verifies that in-range values pass through the clamp unchanged.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one on the inclusive bounds, which would
/// make full stick deflection (exactly 100 / -100) unreachable.
#[test]
fn given_in_range_values_when_clamped_then_unchanged() {
    for value in [-100_i64, -99, -1, 0, 1, 42, 99, 100] {
        assert_eq!(clamp_axis(value), value as i32, "value {value} should pass through");
    }
}

/// **VALUE**: Verifies the clamp is total, including the extremes of `i64`.
///
/// **WHY THIS MATTERS**: Values come straight off the network. A clamp that overflows or
/// panics on `i64::MIN` would let a single crafted message crash a connection task.
#[test]
fn given_out_of_range_values_when_clamped_then_pinned_to_bounds() {
    assert_eq!(clamp_axis(101), AXIS_MAX);
    assert_eq!(clamp_axis(200), AXIS_MAX);
    assert_eq!(clamp_axis(i64::MAX), AXIS_MAX);
    assert_eq!(clamp_axis(-101), AXIS_MIN);
    assert_eq!(clamp_axis(-150), AXIS_MIN);
    assert_eq!(clamp_axis(i64::MIN), AXIS_MIN);
}

/// **VALUE**: Verifies each direction axis is clamped on its own.
#[test]
fn given_mixed_axes_when_direction_clamped_then_each_axis_independent() {
    // GIVEN/WHEN: One axis out of range, the other inside
    let direction = Direction::clamped(150, -30);

    // THEN: Only the out-of-range axis moves
    assert_eq!(direction, Direction { x: 100, y: -30 });
}

/// **VALUE**: Verifies the resting state is all zeros and renders readably in logs.
#[test]
fn given_default_controls_when_formatted_then_all_axes_zero() {
    let controls = Controls::default();

    assert_eq!(controls.speed, 0);
    assert_eq!(controls.direction, Direction { x: 0, y: 0 });
    assert_eq!(controls.to_string(), "speed=0 x=0 y=0");
}
