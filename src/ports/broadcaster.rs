//! Broadcaster port - Interface for fanning messages out to connections.
//!
//! The message router and the telemetry scheduler depend on this port
//! rather than on the concrete connection registry, so both can be driven
//! against a recording fake in tests.

use async_trait::async_trait;

use crate::domain::foundation::ConnectionId;

/// Errors that can occur when delivering to one specific connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// No connection with this id is registered.
    #[error("Connection {0} is not registered")]
    NotRegistered(ConnectionId),

    /// The connection's outbound queue is closed (peer gone or write failed).
    #[error("Connection {0} is closed")]
    Closed(ConnectionId),

    /// The connection's outbound queue is full.
    #[error("Connection {0} is not keeping up with outbound messages")]
    Backpressure(ConnectionId),
}

impl DeliveryError {
    /// The connection the failed delivery was addressed to.
    pub fn connection_id(&self) -> &ConnectionId {
        match self {
            DeliveryError::NotRegistered(id)
            | DeliveryError::Closed(id)
            | DeliveryError::Backpressure(id) => id,
        }
    }
}

/// Port for delivering text messages to connected clients.
///
/// Broadcasts are best-effort: they never fail, and return the number of
/// connections that accepted the message. Unicast reports failure to the
/// caller, who owns the affected session.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Send `message` to every registered connection.
    async fn broadcast(&self, message: &str) -> usize;

    /// Send `message` to every registered connection except `excluded`.
    async fn broadcast_except(&self, excluded: &ConnectionId, message: &str) -> usize;

    /// Send `message` to one connection.
    async fn send_to(&self, id: &ConnectionId, message: &str) -> Result<(), DeliveryError>;
}
