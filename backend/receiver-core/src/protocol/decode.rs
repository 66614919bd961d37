use crate::error::protocol::ProtocolError;

use common::ErrorLocation;
use models::ControlCommand;

use std::panic::Location;

use serde_json::{Map, Value};

const TYPE_FIELD: &str = "type";
const SPEED_TYPE: &str = "speed";
const DIRECTION_TYPE: &str = "direction";

/// Decode a binary frame. The bytes must be UTF-8 text.
#[track_caller]
pub fn decode_frame(bytes: &[u8]) -> Result<ControlCommand, ProtocolError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ProtocolError::MalformedPayload {
        message: format!("Frame is not valid UTF-8: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    decode_command(text)
}

/// Decode one text message into a [`ControlCommand`].
///
/// Values are returned unclamped. Fractional numbers are rounded to the
/// nearest integer, unknown extra fields are ignored.
///
/// # Errors
///
/// - [`ProtocolError::MalformedPayload`] - not JSON, or not a JSON object
/// - [`ProtocolError::UnknownCommand`] - `type` missing, not a string, or unrecognized
/// - [`ProtocolError::MissingField`] - `value`, `x` or `y` absent for the given `type`
/// - [`ProtocolError::InvalidField`] - a required field is not a number
#[track_caller]
pub fn decode_command(text: &str) -> Result<ControlCommand, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ProtocolError::MalformedPayload {
        message: format!("Invalid JSON: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let record = match value {
        Value::Object(record) => record,
        other => {
            return Err(ProtocolError::MalformedPayload {
                message: format!("Expected a JSON object, got {}", json_kind(&other)),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let command_type = match record.get(TYPE_FIELD) {
        Some(Value::String(command_type)) => command_type.as_str(),
        Some(other) => {
            return Err(ProtocolError::UnknownCommand {
                message: format!("'type' must be a string, got {}", json_kind(other)),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        None => {
            return Err(ProtocolError::UnknownCommand {
                message: "'type' field is missing".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    match command_type {
        SPEED_TYPE => Ok(ControlCommand::Speed {
            value: integer_field(&record, SPEED_TYPE, "value")?,
        }),
        DIRECTION_TYPE => Ok(ControlCommand::Direction {
            x: integer_field(&record, DIRECTION_TYPE, "x")?,
            y: integer_field(&record, DIRECTION_TYPE, "y")?,
        }),
        other => Err(ProtocolError::UnknownCommand {
            message: format!("Unrecognized command type '{other}'"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn integer_field(
    record: &Map<String, Value>,
    command_type: &str,
    field: &'static str,
) -> Result<i64, ProtocolError> {
    let value = record.get(field).ok_or_else(|| ProtocolError::MissingField {
        field,
        message: format!("required by '{command_type}' command"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    as_integer(value).ok_or_else(|| ProtocolError::InvalidField {
        field,
        message: format!("expected a number, got {}", json_kind(value)),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Integer view of a JSON number. Out-of-range values saturate, the clamp
/// downstream pins them to the axis bounds anyway.
fn as_integer(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };

    if let Some(signed) = number.as_i64() {
        return Some(signed);
    }

    if let Some(unsigned) = number.as_u64() {
        return Some(i64::try_from(unsigned).unwrap_or(i64::MAX));
    }

    number
        .as_f64()
        .filter(|float| float.is_finite())
        .map(|float| float.round() as i64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
