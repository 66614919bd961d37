use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Lowest value any control axis can hold (full reverse / full left).
pub const AXIS_MIN: i32 = -100;

/// Highest value any control axis can hold (full forward / full right).
pub const AXIS_MAX: i32 = 100;

/// Clamps a raw axis value into `[AXIS_MIN, AXIS_MAX]`, inclusive.
///
/// Total over every `i64`, so callers never have to pre-validate input.
pub const fn clamp_axis(value: i64) -> i32 {
    if value < AXIS_MIN as i64 {
        AXIS_MIN
    } else if value > AXIS_MAX as i64 {
        AXIS_MAX
    } else {
        value as i32
    }
}

/// Joystick deflection on two axes, each within `[AXIS_MIN, AXIS_MAX]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub x: i32,
    pub y: i32,
}

impl Direction {
    /// Builds a direction from raw input, clamping each axis independently.
    pub const fn clamped(x: i64, y: i64) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }
}

/// Desired motion of the vehicle. Positive speed is forward by convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Controls {
    pub speed: i32,
    pub direction: Direction,
}

impl Display for Controls {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(
            formatter,
            "speed={} x={} y={}",
            self.speed, self.direction.x, self.direction.y
        )
    }
}
