use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

/// Failures loading, saving or validating `config.json` and `RECEIVER_*` overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    /// Covers directory creation, the temp file write and the final rename.
    #[error("Config Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config path exists but is not a directory.
    #[error("Config Directory Not Found Error: {path} {location}")]
    DirectoryNotFound {
        location: ErrorLocation,
        path: PathBuf,
    },

    #[error("Config Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },

    /// A value is out of range, or an environment override does not parse.
    #[error("Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}
