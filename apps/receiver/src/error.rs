use common::ErrorLocation;

use receiver_core::error::config::ConfigError;
use receiver_core::error::receiver::ReceiverError;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors that stop the receiver process.
///
/// Source errors are flattened to strings so the whole value stays
/// serializable for structured log sinks.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ReceiverAppError {
    /// Listener could not start
    #[error("Receiver Error: {message} {location}")]
    Receiver {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Logger could not be installed
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ReceiverError> for ReceiverAppError {
    #[track_caller]
    fn from(error: ReceiverError) -> Self {
        ReceiverAppError::Receiver {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for ReceiverAppError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        ReceiverAppError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
