//! MessageRouter - Dispatch one inbound frame to chat or the device.

use std::sync::Arc;

use crate::domain::device::DeviceSimulator;
use crate::domain::foundation::ConnectionId;
use crate::domain::relay::InboundMessage;
use crate::ports::{Broadcaster, DeliveryError};

/// What the router did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Chat text fanned out; `delivered` peers accepted it.
    Broadcast { delivered: usize },
    /// Device reply unicast to the sender.
    Replied,
}

/// Routes inbound text for every session.
///
/// Chat is broadcast verbatim; `/device` commands go to the simulator and
/// the reply goes back to the sender only.
pub struct MessageRouter {
    broadcaster: Arc<dyn Broadcaster>,
    device: Arc<DeviceSimulator>,
    echo_to_sender: bool,
}

impl MessageRouter {
    /// Create a router that includes the sender in chat broadcasts.
    pub fn new(broadcaster: Arc<dyn Broadcaster>, device: Arc<DeviceSimulator>) -> Self {
        Self {
            broadcaster,
            device,
            echo_to_sender: true,
        }
    }

    /// Set whether chat messages are echoed back to their sender.
    pub fn with_echo_to_sender(mut self, echo: bool) -> Self {
        self.echo_to_sender = echo;
        self
    }

    /// Route one text frame from `sender`.
    ///
    /// # Errors
    ///
    /// Returns the unicast failure when a device reply cannot be delivered
    /// to the sender. Chat broadcasts never fail.
    pub async fn route(
        &self,
        sender: &ConnectionId,
        text: &str,
    ) -> Result<RouteOutcome, DeliveryError> {
        match InboundMessage::classify(text) {
            InboundMessage::Chat(chat) => {
                let delivered = if self.echo_to_sender {
                    self.broadcaster.broadcast(chat).await
                } else {
                    self.broadcaster.broadcast_except(sender, chat).await
                };
                tracing::debug!(connection_id = %sender, delivered, "Chat message broadcast");
                Ok(RouteOutcome::Broadcast { delivered })
            }
            InboundMessage::DeviceCommand(token) => {
                let reply = self.device.handle(token);
                tracing::debug!(connection_id = %sender, command = token, "Device command handled");
                self.broadcaster.send_to(sender, &reply).await?;
                Ok(RouteOutcome::Replied)
            }
        }
    }
}
