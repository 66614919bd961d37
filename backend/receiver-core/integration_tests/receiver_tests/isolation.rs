use crate::receiver_tests::helpers::{
    connect, send_text, start_test_receiver, wait_for_close, wait_for_controls,
};

use models::{Controls, Direction};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

// ============================================================================
// Failure isolation: one bad session never takes down the service
// ============================================================================

/// **VALUE**: Verifies an unknown command closes only that connection and leaves state alone.
///
/// **WHY THIS MATTERS**: A buggy or hostile client must not be able to move the vehicle with
/// junk, nor stop other clients from connecting.
#[tokio::test]
async fn given_unknown_command_when_sent_then_connection_closed_and_state_unchanged() {
    // GIVEN: A receiver with known state
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;
    send_text(&mut ws, r#"{"type":"speed","value":25}"#).await;
    let before = Controls {
        speed: 25,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, before).await);

    // WHEN: Sending an unrecognized command
    send_text(&mut ws, r#"{"type": "spin"}"#).await;

    // THEN: The connection is closed and the state is untouched
    assert!(wait_for_close(&mut ws).await, "Connection should be closed");
    assert_eq!(state.snapshot().await, before);

    // AND: A new connection still works
    let mut next = connect(handle.local_addr()).await;
    send_text(&mut next, r#"{"type":"speed","value":-5}"#).await;
    let after = Controls {
        speed: -5,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, after).await);
}

/// **VALUE**: Verifies every rejection kind closes the connection.
#[tokio::test]
async fn given_bad_payloads_when_sent_then_each_connection_closed() {
    let (handle, state) = start_test_receiver(None).await;

    for payload in [
        "not json at all",
        r#"["speed", 10]"#,
        r#"{"value": 10}"#,
        r#"{"type":"speed"}"#,
        r#"{"type":"direction","x":5}"#,
        r#"{"type":"speed","value":"fast"}"#,
    ] {
        let mut ws = connect(handle.local_addr()).await;
        send_text(&mut ws, payload).await;
        assert!(wait_for_close(&mut ws).await, "{payload} should close the connection");
    }

    assert_eq!(state.snapshot().await, Controls::default());
    assert!(handle.is_accepting());
}

/// **VALUE**: Verifies that messages queued behind a bad frame are never applied.
///
/// **BUG THIS CATCHES**: Would catch a handler that logs the error and carries on reading.
#[tokio::test]
async fn given_valid_message_after_bad_frame_when_sent_then_not_applied() {
    let (handle, state) = start_test_receiver(None).await;
    let mut ws = connect(handle.local_addr()).await;

    send_text(&mut ws, "{broken").await;
    let _ = futures_util::SinkExt::send(
        &mut ws,
        tokio_tungstenite::tungstenite::Message::Text(
            r#"{"type":"speed","value":90}"#.to_string().into(),
        ),
    )
    .await;

    assert!(wait_for_close(&mut ws).await);
    assert_eq!(state.get_speed().await, 0);
}

/// **VALUE**: Verifies a malformed message on connection A does not disturb connection B.
#[tokio::test]
async fn given_two_clients_when_one_sends_garbage_then_other_keeps_working() {
    // GIVEN: Two connected clients
    let (handle, state) = start_test_receiver(None).await;
    let mut a = connect(handle.local_addr()).await;
    let mut b = connect(handle.local_addr()).await;

    send_text(&mut b, r#"{"type":"direction","x":10,"y":10}"#).await;
    let first = Controls {
        speed: 0,
        direction: Direction { x: 10, y: 10 },
    };
    assert!(wait_for_controls(&state, first).await);

    // WHEN: A sends garbage and is closed
    send_text(&mut a, "garbage").await;
    assert!(wait_for_close(&mut a).await);

    // THEN: B is still connected and its updates apply
    send_text(&mut b, r#"{"type":"speed","value":70}"#).await;
    let second = Controls {
        speed: 70,
        direction: Direction { x: 10, y: 10 },
    };
    assert!(wait_for_controls(&state, second).await);
}

/// **VALUE**: Verifies an abrupt disconnect (no close handshake) on A does not affect B.
///
/// **WHY THIS MATTERS**: Phones on flaky Wi-Fi drop off without a close frame all the time.
#[tokio::test]
async fn given_client_dropped_without_close_when_other_client_sends_then_applied() {
    let (handle, state) = start_test_receiver(None).await;
    let mut a = connect(handle.local_addr()).await;
    let mut b = connect(handle.local_addr()).await;

    send_text(&mut a, r#"{"type":"speed","value":15}"#).await;
    let first = Controls {
        speed: 15,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, first).await);

    // WHEN: A vanishes without a close frame
    drop(a);

    // THEN: B keeps working and the state from A is intact
    send_text(&mut b, r#"{"type":"direction","x":-1,"y":2}"#).await;
    let second = Controls {
        speed: 15,
        direction: Direction { x: -1, y: 2 },
    };
    assert!(wait_for_controls(&state, second).await);
}

/// **VALUE**: Verifies a failed WebSocket handshake does not stop the listener.
///
/// **BUG THIS CATCHES**: Would catch an upgrade done inside the accept loop, where one
/// plain-HTTP or port-scanner connection could stall or kill the listener.
#[tokio::test]
async fn given_non_websocket_client_when_connected_then_listener_still_accepts() {
    let (handle, state) = start_test_receiver(None).await;

    // GIVEN: A raw TCP client that speaks nonsense instead of an HTTP upgrade
    let mut raw = TcpStream::connect(handle.local_addr())
        .await
        .expect("TCP connect should succeed");
    raw.write_all(b"HELLO ROBOT\r\n\r\n").await.expect("write");
    drop(raw);

    // WHEN/THEN: A proper client can still connect and steer
    let mut ws = connect(handle.local_addr()).await;
    send_text(&mut ws, r#"{"type":"speed","value":3}"#).await;
    let expected = Controls {
        speed: 3,
        direction: Direction::default(),
    };
    assert!(wait_for_controls(&state, expected).await);
}
