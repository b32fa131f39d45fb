//! Integration tests for the relay core.
//!
//! These drive the real connection registry, message router, device
//! simulator, and telemetry scheduler in-process. Each simulated client is
//! just the receiving end of its outbound queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use zinchat::adapters::websocket::{ConnectionHandle, ConnectionRegistry};
use zinchat::application::{MessageRouter, RouteOutcome, TelemetryScheduler};
use zinchat::domain::device::{
    DeviceSimulator, ReadingRange, SensorReadings, DEVICE_STARTED, UNRECOGNIZED_COMMAND,
};
use zinchat::domain::foundation::ConnectionId;
use zinchat::ports::{Broadcaster, DeliveryError};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Relay {
    registry: Arc<ConnectionRegistry>,
    device: Arc<DeviceSimulator>,
    router: MessageRouter,
    readings: Arc<SensorReadings>,
}

impl Relay {
    fn new() -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let readings = Arc::new(SensorReadings::seeded(2024, ReadingRange::default()));
        let device = Arc::new(DeviceSimulator::new(readings.clone()));
        let router = MessageRouter::new(registry.clone(), device.clone());
        Self {
            registry,
            device,
            router,
            readings,
        }
    }

    async fn connect(&self) -> Client {
        let id = ConnectionId::new();
        let (handle, inbox) = ConnectionHandle::channel(32);
        self.registry.register(id, handle).await;
        Client { id, inbox }
    }
}

struct Client {
    id: ConnectionId,
    inbox: mpsc::Receiver<String>,
}

impl Client {
    fn take(&mut self) -> Option<String> {
        self.inbox.try_recv().ok()
    }

    fn assert_empty(&mut self) {
        assert_eq!(self.take(), None, "client {} got an unexpected message", self.id);
    }
}

fn reading_value(text: &str) -> i64 {
    text.strip_prefix("Sensor reading: ")
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("not a sensor reading: {:?}", text))
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn hello_reaches_every_client_including_sender() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;
    let mut c = relay.connect().await;

    let outcome = relay.router.route(&a.id, "hello").await.unwrap();

    assert_eq!(outcome, RouteOutcome::Broadcast { delivered: 3 });
    assert_eq!(a.take().as_deref(), Some("hello"));
    assert_eq!(b.take().as_deref(), Some("hello"));
    assert_eq!(c.take().as_deref(), Some("hello"));
}

#[tokio::test]
async fn sender_is_skipped_when_echo_is_off() {
    let registry = Arc::new(ConnectionRegistry::new());
    let device = Arc::new(DeviceSimulator::new(Arc::new(SensorReadings::default())));
    let router = MessageRouter::new(registry.clone(), device).with_echo_to_sender(false);

    let a = ConnectionId::new();
    let (handle_a, mut inbox_a) = ConnectionHandle::channel(4);
    registry.register(a, handle_a).await;
    let b = ConnectionId::new();
    let (handle_b, mut inbox_b) = ConnectionHandle::channel(4);
    registry.register(b, handle_b).await;

    router.route(&a, "hi").await.unwrap();

    assert_eq!(inbox_b.try_recv().ok().as_deref(), Some("hi"));
    assert!(inbox_a.try_recv().is_err());
}

#[tokio::test]
async fn chat_is_delivered_byte_for_byte() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    let samples = [
        "",
        "   padded   ",
        "/devices are cool",
        " /device status",
        "/DEVICE status",
        "émoji 🚀 and ümlauts",
        "line\nbreak",
    ];

    for sample in samples {
        relay.router.route(&a.id, sample).await.unwrap();
        assert_eq!(a.take().as_deref(), Some(sample));
        assert_eq!(b.take().as_deref(), Some(sample));
    }
}

#[tokio::test]
async fn broadcast_reaches_exactly_the_registered_set() {
    for n in [0usize, 1, 2, 10] {
        let relay = Relay::new();
        let mut clients = Vec::new();
        for _ in 0..n {
            clients.push(relay.connect().await);
        }

        assert_eq!(relay.registry.broadcast("ping").await, n);
        for client in &mut clients {
            assert_eq!(client.take().as_deref(), Some("ping"));
        }
    }
}

#[tokio::test]
async fn disconnected_client_is_pruned_without_affecting_others() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let gone = relay.connect().await;
    let mut c = relay.connect().await;
    let gone_id = gone.id;
    drop(gone);

    let outcome = relay.router.route(&a.id, "still here").await.unwrap();

    assert_eq!(outcome, RouteOutcome::Broadcast { delivered: 2 });
    assert_eq!(a.take().as_deref(), Some("still here"));
    assert_eq!(c.take().as_deref(), Some("still here"));
    assert!(!relay.registry.contains(&gone_id).await);
    assert_eq!(relay.registry.connection_count().await, 2);
}

#[tokio::test]
async fn unregistered_client_no_longer_receives() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    assert!(relay.registry.unregister(&b.id).await);
    assert!(!relay.registry.unregister(&b.id).await);

    relay.router.route(&a.id, "after").await.unwrap();

    assert_eq!(a.take().as_deref(), Some("after"));
    b.assert_empty();
}

// =============================================================================
// Device commands
// =============================================================================

#[tokio::test]
async fn status_goes_only_to_sender() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    let outcome = relay.router.route(&a.id, "/device status").await.unwrap();

    assert_eq!(outcome, RouteOutcome::Replied);
    let reply = a.take().expect("sender should get a reply");
    assert!((0..=100).contains(&reading_value(&reply)));
    b.assert_empty();
}

#[tokio::test]
async fn start_by_one_client_does_not_affect_status_for_another() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    relay.router.route(&a.id, "/device start").await.unwrap();
    assert_eq!(a.take().as_deref(), Some(DEVICE_STARTED));
    assert!(relay.device.is_running());

    relay.router.route(&b.id, "/device status").await.unwrap();
    let reply = b.take().expect("B should get a status reply");
    assert!((0..=100).contains(&reading_value(&reply)));
    a.assert_empty();
}

#[tokio::test]
async fn repeated_start_yields_identical_reply() {
    let relay = Relay::new();
    let mut a = relay.connect().await;

    relay.router.route(&a.id, "/device start").await.unwrap();
    relay.router.route(&a.id, "/device start").await.unwrap();

    let first = a.take().expect("first reply");
    let second = a.take().expect("second reply");
    assert_eq!(first, DEVICE_STARTED);
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_command_explains_itself_and_changes_nothing() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    relay.router.route(&a.id, "/device frobnicate").await.unwrap();
    relay.router.route(&a.id, "/device").await.unwrap();

    assert_eq!(a.take().as_deref(), Some(UNRECOGNIZED_COMMAND));
    assert_eq!(a.take().as_deref(), Some(UNRECOGNIZED_COMMAND));
    assert!(!relay.device.is_running());
    b.assert_empty();
}

#[tokio::test]
async fn reply_to_vanished_sender_is_an_error() {
    let relay = Relay::new();
    let a = relay.connect().await;
    let a_id = a.id;
    drop(a);

    let result = relay.router.route(&a_id, "/device status").await;

    assert_eq!(result, Err(DeliveryError::Closed(a_id)));
}

// =============================================================================
// Telemetry
// =============================================================================

#[tokio::test]
async fn telemetry_tick_without_clients_is_harmless() {
    let relay = Relay::new();
    let scheduler = TelemetryScheduler::new(
        relay.registry.clone(),
        relay.readings.clone(),
        Duration::from_secs(10),
    );

    assert_eq!(scheduler.tick().await, 0);
}

#[tokio::test]
async fn telemetry_tick_reaches_all_clients() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;
    let scheduler = TelemetryScheduler::new(
        relay.registry.clone(),
        relay.readings.clone(),
        Duration::from_secs(10),
    );

    assert_eq!(scheduler.tick().await, 2);

    let seen_a = a.take().unwrap();
    let seen_b = b.take().unwrap();
    assert_eq!(seen_a, seen_b);
    assert!((0..=100).contains(&reading_value(&seen_a)));
}

#[tokio::test]
async fn chat_and_telemetry_interleave_in_order_per_client() {
    let relay = Relay::new();
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;
    let scheduler = TelemetryScheduler::new(
        relay.registry.clone(),
        relay.readings.clone(),
        Duration::from_secs(10),
    );

    relay.router.route(&a.id, "first").await.unwrap();
    scheduler.tick().await;
    relay.router.route(&b.id, "second").await.unwrap();

    for client in [&mut a, &mut b] {
        assert_eq!(client.take().as_deref(), Some("first"));
        assert!(client.take().unwrap().starts_with("Sensor reading: "));
        assert_eq!(client.take().as_deref(), Some("second"));
    }
}
