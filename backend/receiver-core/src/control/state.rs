//! Control state shared by all connections.
//!
//! Last write wins: there is one vehicle, so there is one target. Each update
//! takes the write lock once, which keeps a direction change indivisible from
//! the point of view of readers.

use models::{ControlCommand, Controls, Direction, clamp_axis};

use std::sync::Arc;

use log::info;
use tokio::sync::{RwLock, watch};

/// Handle to the latest desired speed and direction.
///
/// # Thread Safety
///
/// This type is `Clone` and can be shared across tasks. All clones share the
/// same underlying state.
#[derive(Clone)]
pub struct ControlState {
    /// Current clamped controls
    controls: Arc<RwLock<Controls>>,

    /// Change feed for the actuation layer, published under the write lock
    changes: Arc<watch::Sender<Controls>>,
}

impl ControlState {
    /// Create a control state at rest (speed 0, direction 0/0).
    pub fn new() -> Self {
        let (changes, _) = watch::channel(Controls::default());
        Self {
            controls: Arc::new(RwLock::new(Controls::default())),
            changes: Arc::new(changes),
        }
    }

    /// Set speed to `value` clamped into `[-100, 100]`.
    pub async fn update_speed(&self, value: i64) {
        let speed = clamp_axis(value);

        let mut controls = self.controls.write().await;
        controls.speed = speed;
        self.changes.send_replace(*controls);
        drop(controls);

        info!("Speed updated to: {speed}");
    }

    /// Set both direction axes, each clamped into `[-100, 100]` independently.
    pub async fn update_direction(&self, x: i64, y: i64) {
        let direction = Direction::clamped(x, y);

        let mut controls = self.controls.write().await;
        controls.direction = direction;
        self.changes.send_replace(*controls);
        drop(controls);

        info!(
            "Direction updated to: x={}, y={}",
            direction.x, direction.y
        );
    }

    /// Route a decoded command to the matching update.
    pub async fn apply(&self, command: ControlCommand) {
        match command {
            ControlCommand::Speed { value } => self.update_speed(value).await,
            ControlCommand::Direction { x, y } => self.update_direction(x, y).await,
        }
    }

    pub async fn get_speed(&self) -> i32 {
        self.controls.read().await.speed
    }

    pub async fn get_direction(&self) -> Direction {
        self.controls.read().await.direction
    }

    /// Speed and direction read under one lock.
    pub async fn snapshot(&self) -> Controls {
        *self.controls.read().await
    }

    /// Subscribe to every published change.
    ///
    /// The receiver starts out holding the current controls.
    pub fn subscribe(&self) -> watch::Receiver<Controls> {
        self.changes.subscribe()
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
