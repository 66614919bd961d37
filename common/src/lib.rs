//! Shared plumbing for the joystick receiver workspace.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location tracking used by every error enum
//! - **models**: pure control data (speed, direction, commands)
//! - **receiver-core**: control state, command decoding, WebSocket listener
//! - **joystick-receiver**: process wiring (config, logging, signals)

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
