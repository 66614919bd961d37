//! Control data for a single remotely driven vehicle.
//!
//! These are pure data structures with no I/O. `receiver-core` stores and
//! mutates them, the actuation layer reads them.

pub mod command;
pub mod controls;

pub use command::ControlCommand;
pub use controls::{AXIS_MAX, AXIS_MIN, Controls, Direction, clamp_axis};

#[cfg(test)]
mod tests;
