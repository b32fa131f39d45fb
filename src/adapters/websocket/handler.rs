//! WebSocket upgrade handler for chat connections.
//!
//! Handles the HTTP → WebSocket upgrade and runs the connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Register the connection and spawn its writer task
//! 3. Route each inbound text frame until disconnect, failure, or shutdown
//! 4. Unregister and let the writer close the socket

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio::time;

use crate::application::MessageRouter;

use super::registry::ConnectionRegistry;
use super::session::{CloseReason, ConnectionSession};

/// How long a closing session waits for its writer to flush.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct RelayState {
    /// Live connection set shared by every session and the scheduler.
    pub registry: Arc<ConnectionRegistry>,
    /// Chat/device dispatch.
    pub router: Arc<MessageRouter>,
    /// Per-connection outbound queue depth.
    pub outbound_buffer: usize,
    /// Flips to `true` on server shutdown.
    pub shutdown: watch::Receiver<bool>,
}

impl RelayState {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        router: Arc<MessageRouter>,
        outbound_buffer: usize,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            registry,
            router,
            outbound_buffer,
            shutdown,
        }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<RelayState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. Inbound frames are processed
/// one at a time, so per-connection order is preserved.
async fn handle_socket(socket: WebSocket, state: RelayState) {
    let (mut sender, mut receiver) = socket.split();

    let (mut session, mut outbound) =
        ConnectionSession::open(state.registry.clone(), state.outbound_buffer).await;
    let client_id = *session.id();

    // Forward queued messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = sender.send(Message::Text(text)).await {
                tracing::debug!(
                    connection_id = %client_id,
                    "Send error, closing connection: {}",
                    e
                );
                return;
            }
        }
        let _ = sender.close().await;
    });

    let mut shutdown = state.shutdown.clone();
    let reason = loop {
        if *shutdown.borrow() {
            break CloseReason::ServerShutdown;
        }

        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = state.router.route(&client_id, &text).await {
                        tracing::debug!(connection_id = %client_id, "Reply failed: {}", e);
                        break CloseReason::ReplyFailed;
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!(
                        connection_id = %client_id,
                        "Received unsupported binary message"
                    );
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    // Handled automatically by axum
                }
                Some(Ok(Message::Close(_))) | None => {
                    break CloseReason::ClientClosed;
                }
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %client_id, "Receive error: {}", e);
                    break CloseReason::ReadError;
                }
            },

            _ = &mut send_task => {
                break CloseReason::WriteFailed;
            }

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break CloseReason::ServerShutdown;
                }
            }
        }
    };

    session.begin_close(reason);
    session.close().await;

    // Unregistering dropped the queue sender, so the writer drains and exits.
    if reason != CloseReason::WriteFailed
        && time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task).await.is_err()
    {
        send_task.abort();
    }
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> Router<RelayState> {
    Router::new().route("/ws", get(ws_handler))
}
