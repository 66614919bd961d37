//! Handle returned by [`start_receiver`](crate::receiver::start_receiver).

use std::net::SocketAddr;

use log::info;
use tokio::task::JoinHandle;

/// Handle to a running receiver.
///
/// # Lifecycle
///
/// Dropping the handle does **not** stop the listener; it runs until the
/// process exits or [`ReceiverHandle::shutdown`] is called. Connections that
/// were already accepted keep running on their own tasks either way.
pub struct ReceiverHandle {
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl ReceiverHandle {
    pub(crate) fn new(local_addr: SocketAddr, accept_task: JoinHandle<()>) -> Self {
        Self {
            local_addr,
            accept_task,
        }
    }

    /// Address the listener is bound to. Resolves port 0 to the real port.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_accepting(&self) -> bool {
        !self.accept_task.is_finished()
    }

    /// Stop accepting new connections.
    pub fn shutdown(self) {
        self.accept_task.abort();
        info!("Receiver on {} stopped accepting connections", self.local_addr);
    }
}
