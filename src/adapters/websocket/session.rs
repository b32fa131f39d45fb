//! Lifecycle bookkeeping for one WebSocket client.
//!
//! Opening a session registers the connection; closing it walks the
//! `Active → Closing → Closed` state machine and unregisters. Closing twice
//! is harmless.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::foundation::{ConnectionId, StateMachine};
use crate::domain::relay::SessionState;

use super::registry::{ConnectionHandle, ConnectionRegistry};

/// Why a session left the `Active` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Close frame received or the stream ended.
    ClientClosed,
    /// The transport reported a read error.
    ReadError,
    /// The writer task stopped (socket write failed or the registry pruned us).
    WriteFailed,
    /// A device reply could not be delivered to this connection.
    ReplyFailed,
    /// The server is shutting down.
    ServerShutdown,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CloseReason::ClientClosed => "client closed",
            CloseReason::ReadError => "read error",
            CloseReason::WriteFailed => "write failed",
            CloseReason::ReplyFailed => "reply failed",
            CloseReason::ServerShutdown => "server shutdown",
        };
        write!(f, "{}", s)
    }
}

/// One registered client connection.
pub struct ConnectionSession {
    id: ConnectionId,
    state: SessionState,
    close_reason: Option<CloseReason>,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectionSession {
    /// Register a fresh connection and enter `Active`.
    ///
    /// Returns the session and the outbound queue its writer task drains.
    pub async fn open(
        registry: Arc<ConnectionRegistry>,
        outbound_buffer: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (handle, outbound) = ConnectionHandle::channel(outbound_buffer);
        registry.register(id, handle).await;

        tracing::info!(connection_id = %id, "Client connected");

        let session = Self {
            id,
            state: SessionState::Active,
            close_reason: None,
            registry,
        };
        (session, outbound)
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    /// Move from `Active` to `Closing`, recording the first reason seen.
    pub fn begin_close(&mut self, reason: CloseReason) {
        if let Ok(next) = self.state.transition_to(SessionState::Closing) {
            self.state = next;
            self.close_reason = Some(reason);
            tracing::debug!(connection_id = %self.id, reason = %reason, "Session closing");
        }
    }

    /// Finish closing: unregister and enter `Closed`.
    pub async fn close(&mut self) {
        if self.state.is_active() {
            self.begin_close(CloseReason::ServerShutdown);
        }

        if let Ok(next) = self.state.transition_to(SessionState::Closed) {
            self.registry.unregister(&self.id).await;
            self.state = next;
            tracing::info!(
                connection_id = %self.id,
                reason = %self.close_reason.unwrap_or(CloseReason::ServerShutdown),
                "Client disconnected"
            );
        }
    }
}
