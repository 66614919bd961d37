// Unit tests for the per-connection lifecycle

use crate::receiver::{ConnectionPhase, ConnectionState};

use std::net::SocketAddr;

use uuid::Uuid;

fn new_state() -> ConnectionState {
    let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
    ConnectionState::new(Uuid::new_v4(), peer)
}

/// **VALUE**: Verifies the normal lifecycle and the processed-message counter.
#[test]
fn given_new_connection_when_messages_processed_then_counts_each_round() {
    // GIVEN: A freshly accepted connection
    let mut state = new_state();
    assert_eq!(state.phase(), ConnectionPhase::Connected);

    // WHEN: Going through two receive/process rounds
    assert!(state.transition(ConnectionPhase::AwaitingMessage));
    for _ in 0..2 {
        assert!(state.transition(ConnectionPhase::Processing));
        assert!(state.transition(ConnectionPhase::AwaitingMessage));
    }

    // THEN: Both rounds are counted
    assert_eq!(state.messages_processed(), 2);

    // AND: The connection can close from waiting
    assert!(state.transition(ConnectionPhase::Closed));
    assert_eq!(state.phase(), ConnectionPhase::Closed);
}

/// **VALUE**: Verifies a failed message does not count as processed.
#[test]
fn given_processing_when_closed_then_message_not_counted() {
    let mut state = new_state();
    state.transition(ConnectionPhase::AwaitingMessage);
    state.transition(ConnectionPhase::Processing);

    assert!(state.transition(ConnectionPhase::Closed));
    assert_eq!(state.messages_processed(), 0);
}

/// **VALUE**: Verifies `Closed` is terminal.
///
/// **BUG THIS CATCHES**: Would catch a handler that keeps processing after it decided to
/// close, e.g. applying a command that arrived in the same read batch as a bad frame.
#[test]
fn given_closed_connection_when_transition_requested_then_rejected() {
    let mut state = new_state();
    state.transition(ConnectionPhase::Closed);

    assert!(!state.transition(ConnectionPhase::AwaitingMessage));
    assert!(!state.transition(ConnectionPhase::Processing));
    assert!(!state.transition(ConnectionPhase::Closed));
    assert_eq!(state.phase(), ConnectionPhase::Closed);
}

#[test]
fn given_connected_when_processing_requested_then_rejected() {
    let mut state = new_state();

    assert!(!state.transition(ConnectionPhase::Processing));
    assert_eq!(state.phase(), ConnectionPhase::Connected);
}

#[test]
fn given_phases_when_displayed_then_use_kebab_case_names() {
    assert_eq!(ConnectionPhase::Connected.to_string(), "connected");
    assert_eq!(ConnectionPhase::AwaitingMessage.to_string(), "awaiting-message");
    assert_eq!(ConnectionPhase::Processing.to_string(), "processing");
    assert_eq!(ConnectionPhase::Closed.to_string(), "closed");
}
