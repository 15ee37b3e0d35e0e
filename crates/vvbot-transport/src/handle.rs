//! Listener lifecycle handle.

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;

/// Handle to a running listener.
///
/// Dropping this handle stops the listener.
#[derive(Debug)]
pub struct ListenerHandle {
    /// Unique identifier for this listener.
    pub id: String,
    /// The address the OS actually bound (includes the ephemeral port).
    pub local_addr: SocketAddr,
    shutdown_token: CancellationToken,
}

impl ListenerHandle {
    /// Creates a new listener handle.
    pub fn new(
        id: impl Into<String>,
        local_addr: SocketAddr,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            id: id.into(),
            local_addr,
            shutdown_token,
        }
    }

    /// Stops the listener.
    pub fn stop(self) {
        self.shutdown_token.cancel();
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}
