// Unit tests for the actuation seam

use crate::control::{Actuator, ControlState, LoggingActuator, spawn_actuator};

use models::{Controls, Direction};

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records everything it is asked to apply.
struct RecordingActuator {
    applied: Arc<Mutex<Vec<Controls>>>,
}

impl Actuator for RecordingActuator {
    fn name(&self) -> &str {
        "recording"
    }

    fn apply(&mut self, controls: &Controls) {
        self.applied.lock().unwrap().push(*controls);
    }
}

async fn wait_for(applied: &Arc<Mutex<Vec<Controls>>>, expected: Controls) -> bool {
    for _ in 0..100 {
        if applied.lock().unwrap().last() == Some(&expected) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// **VALUE**: Verifies the actuator gets the current controls as soon as it starts.
///
/// **WHY THIS MATTERS**: A driver started after clients already sent commands must not
/// sit idle until the next change; it has to pick up the current target immediately.
#[tokio::test]
async fn given_existing_state_when_actuator_spawned_then_applies_current_controls() {
    // GIVEN: State that already moved
    let state = ControlState::new();
    state.update_speed(60).await;

    // WHEN: Spawning the actuator
    let applied = Arc::new(Mutex::new(Vec::new()));
    let _task = spawn_actuator(
        &state,
        RecordingActuator {
            applied: Arc::clone(&applied),
        },
    );

    // THEN: The first application is the current snapshot
    let expected = Controls {
        speed: 60,
        direction: Direction::default(),
    };
    assert!(wait_for(&applied, expected).await, "Should apply current controls");
}

/// **VALUE**: Verifies the actuator follows later updates with clamped values.
#[tokio::test]
async fn given_running_actuator_when_state_updated_then_latest_controls_applied() {
    let state = ControlState::new();
    let applied = Arc::new(Mutex::new(Vec::new()));
    let _task = spawn_actuator(
        &state,
        RecordingActuator {
            applied: Arc::clone(&applied),
        },
    );

    state.update_speed(250).await;
    state.update_direction(-30, 130).await;

    let expected = Controls {
        speed: 100,
        direction: Direction { x: -30, y: 100 },
    };
    assert!(wait_for(&applied, expected).await, "Should apply latest controls");
}

/// **VALUE**: Verifies the actuator task ends once the state is gone.
///
/// **BUG THIS CATCHES**: Would catch a loop that ignores a closed channel and spins forever.
#[tokio::test]
async fn given_all_state_handles_dropped_when_actuator_running_then_task_finishes() {
    let state = ControlState::new();
    let task = spawn_actuator(&state, LoggingActuator::new());

    drop(state);

    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("Actuator task should stop")
        .expect("Actuator task should not panic");
}

#[test]
fn given_logging_actuator_when_applied_then_counts_applications() {
    let mut actuator = LoggingActuator::new();

    actuator.apply(&Controls::default());
    actuator.apply(&Controls::default());

    assert_eq!(actuator.applied(), 2);
    assert_eq!(actuator.name(), "logging");
}
