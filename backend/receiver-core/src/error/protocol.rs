use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Reasons an inbound control message could not be turned into a command.
///
/// Any of these ends the connection that sent the message.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
    /// Not UTF-8, not JSON, or not a JSON object.
    #[error("Malformed Payload Error: {message} {location}")]
    MalformedPayload {
        message: String,
        location: ErrorLocation,
    },

    /// `type` absent, not a string, or not a known command.
    #[error("Unknown Command Error: {message} {location}")]
    UnknownCommand {
        message: String,
        location: ErrorLocation,
    },

    #[error("Missing Field Error: '{field}' {message} {location}")]
    MissingField {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Field present but not a number.
    #[error("Invalid Field Error: '{field}' {message} {location}")]
    InvalidField {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },
}
