//! Per-connection lifecycle tracking.

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::net::SocketAddr;

use log::{debug, warn};
use uuid::Uuid;

/// Where a connection is in its lifecycle.
///
/// `Connected → AwaitingMessage ⇄ Processing → Closed`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionPhase {
    Connected,
    AwaitingMessage,
    Processing,
    Closed,
}

impl Display for ConnectionPhase {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let name = match self {
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::AwaitingMessage => "awaiting-message",
            ConnectionPhase::Processing => "processing",
            ConnectionPhase::Closed => "closed",
        };
        formatter.write_str(name)
    }
}

/// Connection state for one accepted client.
pub(crate) struct ConnectionState {
    id: Uuid,
    peer: SocketAddr,
    phase: ConnectionPhase,
    messages_processed: u64,
}

impl ConnectionState {
    pub(crate) fn new(id: Uuid, peer: SocketAddr) -> Self {
        Self {
            id,
            peer,
            phase: ConnectionPhase::Connected,
            messages_processed: 0,
        }
    }

    /// Move to `next` if the lifecycle allows it.
    ///
    /// Returns false and leaves the phase untouched otherwise. A finished
    /// `Processing → AwaitingMessage` round counts as one processed message.
    pub(crate) fn transition(&mut self, next: ConnectionPhase) -> bool {
        use ConnectionPhase::{AwaitingMessage, Closed, Connected, Processing};

        let allowed = matches!(
            (self.phase, next),
            (Connected, AwaitingMessage)
                | (AwaitingMessage, Processing)
                | (Processing, AwaitingMessage)
                | (Connected | AwaitingMessage | Processing, Closed)
        );

        if !allowed {
            warn!(
                "Connection {} ({}): ignoring transition {} -> {}",
                self.id, self.peer, self.phase, next
            );
            return false;
        }

        if (self.phase, next) == (Processing, AwaitingMessage) {
            self.messages_processed += 1;
        }

        debug!(
            "Connection {} ({}): {} -> {}",
            self.id, self.peer, self.phase, next
        );
        self.phase = next;
        true
    }

    pub(crate) fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub(crate) fn messages_processed(&self) -> u64 {
        self.messages_processed
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }
}
