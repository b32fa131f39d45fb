//! Registry of live client connections.
//!
//! Each registered connection is represented by the sending half of its
//! bounded outbound queue. A writer task owned by the connection's session
//! drains the queue into the WebSocket sink; when that task stops, the
//! queue closes and the registry observes the peer as gone.
//!
//! ```text
//! broadcast("hi")
//!   │  snapshot under read lock
//!   ├──► conn-a queue ──► writer ──► socket
//!   ├──► conn-b queue ──► writer ──► socket
//!   └──► conn-c queue (closed) ──► pruned
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;

use crate::domain::foundation::ConnectionId;
use crate::ports::{Broadcaster, DeliveryError};

/// Default depth of each connection's outbound queue.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Registry-side handle for one connection's outbound queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Wrap an existing queue sender.
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }

    /// Create a handle plus the receiving end its writer task drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    fn deliver(&self, id: &ConnectionId, message: &str) -> Result<(), DeliveryError> {
        self.tx
            .try_send(message.to_string())
            .map_err(|e| match e {
                TrySendError::Closed(_) => DeliveryError::Closed(*id),
                TrySendError::Full(_) => DeliveryError::Backpressure(*id),
            })
    }
}

/// Tracks the set of currently reachable connections.
///
/// A connection is present if and only if it is known to be open. Failed
/// deliveries during a broadcast remove the failed target.
///
/// # Thread Safety
///
/// Uses `RwLock` for the membership map. Broadcasts take a read lock only
/// long enough to snapshot membership, then deliver without holding it,
/// so concurrent register/unregister never corrupts an in-flight fan-out.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly accepted connection.
    ///
    /// Registering an id that is already present replaces its handle, so the
    /// set never holds the same connection twice.
    pub async fn register(&self, id: ConnectionId, handle: ConnectionHandle) {
        let replaced = self.connections.write().await.insert(id, handle);
        if replaced.is_some() {
            tracing::warn!(connection_id = %id, "Connection re-registered, replacing handle");
        } else {
            tracing::debug!(connection_id = %id, "Connection registered");
        }
    }

    /// Remove a connection.
    ///
    /// Idempotent: returns `false` without error when `id` is absent.
    pub async fn unregister(&self, id: &ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(connection_id = %id, "Connection unregistered");
        }
        removed
    }

    pub async fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.read().await.contains_key(id)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Ids of all registered connections (for monitoring and tests).
    pub async fn connection_ids(&self) -> Vec<ConnectionId> {
        self.connections.read().await.keys().copied().collect()
    }

    async fn snapshot(&self, excluded: Option<&ConnectionId>) -> Vec<(ConnectionId, ConnectionHandle)> {
        self.connections
            .read()
            .await
            .iter()
            .filter(|(id, _)| Some(*id) != excluded)
            .map(|(id, handle)| (*id, handle.clone()))
            .collect()
    }

    async fn fan_out(&self, targets: Vec<(ConnectionId, ConnectionHandle)>, message: &str) -> usize {
        let mut delivered = 0;
        let mut failed = Vec::new();

        for (id, handle) in &targets {
            match handle.deliver(id, message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!("Broadcast delivery failed: {}", e);
                    failed.push(*e.connection_id());
                }
            }
        }

        for id in &failed {
            self.unregister(id).await;
        }

        if !failed.is_empty() {
            tracing::info!(
                delivered,
                pruned = failed.len(),
                "Pruned unreachable connections during broadcast"
            );
        }

        delivered
    }
}

#[async_trait]
impl Broadcaster for ConnectionRegistry {
    async fn broadcast(&self, message: &str) -> usize {
        let targets = self.snapshot(None).await;
        self.fan_out(targets, message).await
    }

    async fn broadcast_except(&self, excluded: &ConnectionId, message: &str) -> usize {
        let targets = self.snapshot(Some(excluded)).await;
        self.fan_out(targets, message).await
    }

    async fn send_to(&self, id: &ConnectionId, message: &str) -> Result<(), DeliveryError> {
        let handle = self
            .connections
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(DeliveryError::NotRegistered(*id))?;

        handle.deliver(id, message)
    }
}
