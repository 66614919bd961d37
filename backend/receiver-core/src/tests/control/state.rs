// Unit tests for the shared control state
// Clamping, last-write-wins and the change feed

use crate::control::ControlState;

use models::{ControlCommand, Controls, Direction};

/// **VALUE**: Verifies a fresh control state is at rest.
///
/// **WHY THIS MATTERS**: The vehicle must not move before any client has sent a command.
#[tokio::test]
async fn given_new_state_when_read_then_speed_and_direction_are_zero() {
    let state = ControlState::new();

    assert_eq!(state.get_speed().await, 0);
    assert_eq!(state.get_direction().await, Direction { x: 0, y: 0 });
    assert_eq!(state.snapshot().await, Controls::default());
}

/// **VALUE**: Verifies speed clamping is total and exact inside the range.
///
/// **BUG THIS CATCHES**: Would catch a clamp that wraps, saturates at the wrong bound,
/// or alters in-range values (e.g. integer division sneaking in).
#[tokio::test]
async fn given_any_speed_when_updated_then_stored_value_is_clamped() {
    let state = ControlState::new();

    let cases = [
        (0_i64, 0_i32),
        (57, 57),
        (-100, -100),
        (100, 100),
        (101, 100),
        (200, 100),
        (-101, -100),
        (i64::MAX, 100),
        (i64::MIN, -100),
    ];

    for (input, expected) in cases {
        state.update_speed(input).await;
        assert_eq!(state.get_speed().await, expected, "input {input}");
    }
}

/// **VALUE**: Verifies direction axes are clamped independently.
#[tokio::test]
async fn given_out_of_range_axis_when_direction_updated_then_only_that_axis_clamped() {
    // GIVEN: A fresh state
    let state = ControlState::new();

    // WHEN: One axis is out of range
    state.update_direction(150, -30).await;

    // THEN: Only x is pinned
    assert_eq!(state.get_direction().await, Direction { x: 100, y: -30 });

    // WHEN: Both axes are out of range in opposite directions
    state.update_direction(-1_000, 1_000).await;

    // THEN: Each is pinned to its own bound
    assert_eq!(state.get_direction().await, Direction { x: -100, y: 100 });
}

/// **VALUE**: Verifies repeating the same update is idempotent.
#[tokio::test]
async fn given_same_speed_twice_when_updated_then_state_matches_single_update() {
    let once = ControlState::new();
    once.update_speed(42).await;

    let twice = ControlState::new();
    twice.update_speed(42).await;
    twice.update_speed(42).await;

    assert_eq!(once.snapshot().await, twice.snapshot().await);
}

/// **VALUE**: Verifies last write wins with no averaging or smoothing.
#[tokio::test]
async fn given_two_speed_updates_when_applied_then_last_one_wins() {
    let state = ControlState::new();

    state.update_speed(50).await;
    state.update_speed(-20).await;

    assert_eq!(state.get_speed().await, -20);
}

/// **VALUE**: Verifies speed and direction updates do not clobber each other.
///
/// **BUG THIS CATCHES**: Would catch an update that rewrites the whole `Controls`
/// from defaults instead of touching only its own field.
#[tokio::test]
async fn given_speed_then_direction_when_applied_then_both_retained() {
    let state = ControlState::new();

    state.update_speed(30).await;
    state.update_direction(-10, 20).await;

    assert_eq!(
        state.snapshot().await,
        Controls {
            speed: 30,
            direction: Direction { x: -10, y: 20 },
        }
    );
}

/// **VALUE**: Verifies `apply()` routes decoded commands to the right update.
#[tokio::test]
async fn given_decoded_commands_when_applied_then_routed_to_matching_update() {
    let state = ControlState::new();

    state.apply(ControlCommand::Speed { value: 200 }).await;
    state.apply(ControlCommand::Direction { x: -150, y: 40 }).await;

    assert_eq!(state.get_speed().await, 100);
    assert_eq!(state.get_direction().await, Direction { x: -100, y: 40 });
}

/// **VALUE**: Verifies clones share one underlying state.
///
/// **WHY THIS MATTERS**: Every connection task holds a clone. If clones copied the
/// data, each client would steer its own private vehicle and the actuator would see none of it.
#[tokio::test]
async fn given_cloned_handle_when_updated_then_original_sees_change() {
    let state = ControlState::new();
    let clone = state.clone();

    clone.update_speed(-75).await;

    assert_eq!(state.get_speed().await, -75);
}

/// **VALUE**: Verifies subscribers observe the clamped value after an update.
#[tokio::test]
async fn given_subscriber_when_state_updated_then_receives_clamped_snapshot() {
    // GIVEN: A subscriber created before the update
    let state = ControlState::new();
    let mut changes = state.subscribe();
    assert_eq!(*changes.borrow(), Controls::default());

    // WHEN: Updating the direction out of range
    state.update_direction(500, 5).await;

    // THEN: The subscriber is notified with the clamped snapshot
    changes.changed().await.expect("sender should still be alive");
    assert_eq!(
        changes.borrow_and_update().direction,
        Direction { x: 100, y: 5 }
    );
}

/// **VALUE**: Verifies concurrent writers from many tasks leave a valid state.
///
/// **WHY THIS MATTERS**: Connections run on a multi-threaded runtime. Whatever the
/// interleaving, the final state must be one of the written values and within bounds.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_writers_when_all_finish_then_state_is_one_written_value() {
    let state = ControlState::new();

    let mut tasks = Vec::new();
    for i in 0..32_i64 {
        let state = state.clone();
        tasks.push(tokio::spawn(async move {
            state.update_direction(i * 10, -i * 10).await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let direction = state.get_direction().await;
    assert!((-100..=100).contains(&direction.x));
    assert!((-100..=100).contains(&direction.y));
    assert_eq!(
        direction.x, -direction.y,
        "Axes must come from the same update"
    );
}
