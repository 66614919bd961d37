use serde::{Deserialize, Serialize};

/// A decoded control message, before clamping.
///
/// Values are kept as received so the control state can log and clamp them
/// in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlCommand {
    /// `{"type": "speed", "value": <integer>}`
    Speed { value: i64 },

    /// `{"type": "direction", "x": <integer>, "y": <integer>}`
    Direction { x: i64, y: i64 },
}

impl ControlCommand {
    /// Wire name carried in the `type` field.
    pub const fn kind(&self) -> &'static str {
        match self {
            ControlCommand::Speed { .. } => "speed",
            ControlCommand::Direction { .. } => "direction",
        }
    }
}
