//! The single shared control target for the vehicle.
//!
//! [`ControlState`] is built once at startup and handed to every connection
//! task. The actuation layer reads it through [`ControlState::subscribe`] or
//! the read accessors; see [`actuation`].

pub mod actuation;
mod state;

pub use actuation::{Actuator, LoggingActuator, spawn_actuator};
pub use state::ControlState;
