//! WebSocket listener for remote-control clients.
//!
//! This module provides:
//!
//! - The listener ([`start_receiver`]) bound to `0.0.0.0:8765` by default
//! - One task per accepted connection, each decoding JSON control messages
//!   and applying them to the shared [`ControlState`](crate::control::ControlState)
//! - A [`ReceiverHandle`] to learn the bound address and stop accepting
//!
//! # Failure isolation
//!
//! A malformed message, a transport error or an idle timeout ends only the
//! connection it happened on. The listener and the other connections keep
//! running. Nothing is sent back to the client besides the close frame.

mod connection_state;
mod handle;
mod server;

pub use handle::ReceiverHandle;
pub use server::start_receiver;

pub(crate) use connection_state::{ConnectionPhase, ConnectionState};
