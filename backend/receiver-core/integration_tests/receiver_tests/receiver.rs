use crate::receiver_tests::helpers::{
    capture_logs, connect, logs_contain, send_text, start_test_receiver, wait_for_close,
    wait_for_controls,
};

use receiver_core::config::ReceiverConfig;
use receiver_core::control::ControlState;
use receiver_core::error::receiver::ReceiverError;
use receiver_core::receiver::start_receiver;

use models::{Controls, Direction};

use std::time::Duration;

use futures_util::SinkExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// Message handling
// ============================================================================

/// **VALUE**: End-to-end check of the documented scenario.
///
/// **WHY THIS MATTERS**: This is exactly what the browser controller does: connect, push
/// speed, push direction. Out-of-range values must be clamped and the clamped values logged.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The listener does not accept WebSocket upgrades
/// - Text frames are not decoded or not applied
/// - Clamping happens per message but the log shows raw values
#[tokio::test]
async fn given_connected_client_when_speed_and_direction_sent_then_state_clamped_and_logged() {
    // GIVEN: Log capture and a running receiver
    capture_logs();
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    // WHEN: Sending out-of-range speed and direction
    send_text(&mut ws, r#"{"type":"speed","value":200}"#).await;
    send_text(&mut ws, r#"{"type":"direction","x":-150,"y":40}"#).await;

    // THEN: State holds the clamped values
    let expected = Controls {
        speed: 100,
        direction: Direction { x: -100, y: 40 },
    };
    assert!(
        wait_for_controls(&state, expected).await,
        "State should be clamped, got {}",
        state.snapshot().await
    );

    // AND: Both clamped values were logged
    assert!(logs_contain("Speed updated to: 100"));
    assert!(logs_contain("Direction updated to: x=-100, y=40"));
}

/// **VALUE**: Verifies messages on one connection are applied in arrival order.
///
/// **BUG THIS CATCHES**: Would catch batching, reordering or dropping of queued frames.
/// With last-write-wins, any of those leaves a value other than the final one.
#[tokio::test]
async fn given_burst_of_messages_when_sent_then_last_message_wins() {
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    for value in -50..=50 {
        send_text(&mut ws, &format!(r#"{{"type":"speed","value":{value}}}"#)).await;
    }
    send_text(&mut ws, r#"{"type":"speed","value":-7}"#).await;
    send_text(&mut ws, r#"{"type":"direction","x":3,"y":4}"#).await;

    let expected = Controls {
        speed: -7,
        direction: Direction { x: 3, y: 4 },
    };
    assert!(wait_for_controls(&state, expected).await);
}

/// **VALUE**: Verifies binary frames carrying UTF-8 JSON are accepted like text frames.
#[tokio::test]
async fn given_binary_frame_when_sent_then_applied() {
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    ws.send(Message::Binary(br#"{"type":"speed","value":-64}"#.to_vec().into()))
        .await
        .expect("Failed to send binary frame");

    let expected = Controls {
        speed: -64,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, expected).await);
}

/// **VALUE**: Verifies fractional values from the browser joystick are rounded and applied.
#[tokio::test]
async fn given_fractional_direction_when_sent_then_rounded_and_applied() {
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    send_text(&mut ws, r#"{"type":"direction","x":12.4,"y":-99.6}"#).await;

    let expected = Controls {
        speed: 0,
        direction: Direction { x: 12, y: -100 },
    };
    assert!(wait_for_controls(&state, expected).await);
}

/// **VALUE**: Verifies control frames (ping) neither close the connection nor touch state.
#[tokio::test]
async fn given_ping_when_sent_then_connection_stays_usable() {
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    ws.send(Message::Ping(b"keepalive".to_vec().into()))
        .await
        .expect("Failed to send ping");
    send_text(&mut ws, r#"{"type":"speed","value":11}"#).await;

    let expected = Controls {
        speed: 11,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, expected).await);
}

/// **VALUE**: Verifies the server never answers control messages.
///
/// **WHY THIS MATTERS**: The protocol is fire-and-forget. Unexpected replies would pile up
/// in clients that never read from the socket.
#[tokio::test]
async fn given_valid_message_when_sent_then_no_reply_frame() {
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    send_text(&mut ws, r#"{"type":"speed","value":1}"#).await;
    let expected = Controls {
        speed: 1,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, expected).await);

    let reply = tokio::time::timeout(Duration::from_millis(200), futures_util::StreamExt::next(&mut ws)).await;
    assert!(reply.is_err(), "Server should not send anything, got {reply:?}");
}

// ============================================================================
// Lifecycle
// ============================================================================

/// **VALUE**: Verifies a clean client close leaves the listener accepting new clients.
#[tokio::test]
async fn given_client_closed_when_new_client_connects_then_accepted() {
    let (handle, state) = start_test_receiver(None).await;

    let mut first = connect(handle.local_addr()).await;
    send_text(&mut first, r#"{"type":"speed","value":20}"#).await;
    first.close(None).await.expect("Failed to close");

    let mut second = connect(handle.local_addr()).await;
    send_text(&mut second, r#"{"type":"speed","value":30}"#).await;

    let expected = Controls {
        speed: 30,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, expected).await);
    assert!(handle.is_accepting());
}

/// **VALUE**: Verifies idle connections are closed when a timeout is configured.
#[tokio::test]
async fn given_idle_timeout_when_client_silent_then_connection_closed() {
    // GIVEN: A receiver with a 1s idle timeout
    let (handle, state) = start_test_receiver(Some(1)).await;
    let mut ws = connect(handle.local_addr()).await;

    // WHEN: The client stays silent past the timeout
    tokio::time::sleep(Duration::from_millis(1_200)).await;

    // THEN: The server has closed the connection without touching state
    assert!(wait_for_close(&mut ws).await, "Idle connection should close");
    assert_eq!(state.snapshot().await, Controls::default());
}

/// **VALUE**: Verifies a busy connection is not closed by the idle timeout.
#[tokio::test]
async fn given_idle_timeout_when_client_active_then_connection_kept() {
    let (handle, state) = start_test_receiver(Some(1)).await;
    let mut ws = connect(handle.local_addr()).await;

    for value in 1..=6 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        send_text(&mut ws, &format!(r#"{{"type":"speed","value":{value}}}"#)).await;
    }

    let expected = Controls {
        speed: 6,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, expected).await);
}

/// **VALUE**: Verifies `shutdown()` stops accepting new connections.
#[tokio::test]
async fn given_shutdown_when_client_connects_then_refused() {
    let (handle, _state) = start_test_receiver(None).await;
    let addr = handle.local_addr();

    handle.shutdown();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let result = connect_async(format!("ws://{}", addr)).await;
    assert!(result.is_err(), "Connection should be refused after shutdown");
}

/// **VALUE**: Verifies a bind conflict is reported as an IO error.
///
/// **BUG THIS CATCHES**: Would catch a start function that spawns the accept loop before
/// binding and "succeeds" while nothing listens.
#[tokio::test]
async fn given_port_in_use_when_starting_then_returns_io_error() {
    let (handle, _state) = start_test_receiver(None).await;

    let mut config = ReceiverConfig::default();
    config.listen.host = String::from("127.0.0.1");
    config.listen.port = handle.local_addr().port();

    let result = start_receiver(&config, ControlState::new()).await;

    assert!(matches!(result, Err(ReceiverError::Io { .. })));
}
