//! Recording broadcaster shared by application-layer tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::ConnectionId;
use crate::ports::{Broadcaster, DeliveryError};

/// One delivery observed by [`RecordingBroadcaster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    All(String),
    AllExcept(ConnectionId, String),
    To(ConnectionId, String),
}

/// Broadcaster that records every call and pretends `audience` peers exist.
pub struct RecordingBroadcaster {
    pub deliveries: Mutex<Vec<Delivery>>,
    pub audience: usize,
    pub fail_unicast: bool,
}

impl RecordingBroadcaster {
    pub fn new(audience: usize) -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            audience,
            fail_unicast: false,
        }
    }

    pub fn failing_unicast() -> Self {
        Self {
            fail_unicast: true,
            ..Self::new(0)
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn broadcast(&self, message: &str) -> usize {
        self.deliveries
            .lock()
            .unwrap()
            .push(Delivery::All(message.to_string()));
        self.audience
    }

    async fn broadcast_except(&self, excluded: &ConnectionId, message: &str) -> usize {
        self.deliveries
            .lock()
            .unwrap()
            .push(Delivery::AllExcept(*excluded, message.to_string()));
        self.audience.saturating_sub(1)
    }

    async fn send_to(&self, id: &ConnectionId, message: &str) -> Result<(), DeliveryError> {
        if self.fail_unicast {
            return Err(DeliveryError::Closed(*id));
        }
        self.deliveries
            .lock()
            .unwrap()
            .push(Delivery::To(*id, message.to_string()));
        Ok(())
    }
}
