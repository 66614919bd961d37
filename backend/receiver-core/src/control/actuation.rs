//! Seam between the control state and whatever drives the hardware.
//!
//! Motor and steering drivers are not part of this crate. They implement
//! [`Actuator`] and are fed by [`spawn_actuator`].

use crate::control::ControlState;

use models::Controls;

use log::{debug, info};
use tokio::task::JoinHandle;

/// Consumer of control changes.
pub trait Actuator {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Apply the latest clamped controls.
    fn apply(&mut self, controls: &Controls);
}

/// Placeholder actuator that only logs what it would apply.
#[derive(Debug, Default)]
pub struct LoggingActuator {
    applied: u64,
}

impl LoggingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots applied so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl Actuator for LoggingActuator {
    fn name(&self) -> &str {
        "logging"
    }

    fn apply(&mut self, controls: &Controls) {
        self.applied += 1;
        debug!("Actuator would apply: {controls}");
    }
}

/// Runs `actuator` against the changes of `state`.
///
/// The current controls are applied once up front, then the latest controls
/// after each change. Bursts of updates may be coalesced into one call. The
/// task ends when every [`ControlState`] handle has been dropped.
pub fn spawn_actuator<A>(state: &ControlState, mut actuator: A) -> JoinHandle<()>
where
    A: Actuator + Send + 'static,
{
    let mut changes = state.subscribe();

    tokio::spawn(async move {
        info!("Actuator '{}' started", actuator.name());

        let initial = *changes.borrow_and_update();
        actuator.apply(&initial);

        while changes.changed().await.is_ok() {
            let controls = *changes.borrow_and_update();
            actuator.apply(&controls);
        }

        info!("Actuator '{}' stopped", actuator.name());
    })
}
