//! TelemetryScheduler - Background service that broadcasts sensor readings.
//!
//! Once per interval a fresh reading is drawn from the shared sensor
//! source, formatted as `Sensor reading: N`, and broadcast to every
//! connected client.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 10s | Time between readings |
//!
//! ## Graceful Shutdown
//!
//! The loop listens on a watch channel and exits when the flag flips to
//! `true` or the sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::device::SensorReadings;
use crate::ports::Broadcaster;

/// Default time between telemetry broadcasts.
pub const DEFAULT_TELEMETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Periodic producer of synthetic telemetry.
pub struct TelemetryScheduler {
    broadcaster: Arc<dyn Broadcaster>,
    readings: Arc<SensorReadings>,
    interval: Duration,
}

impl TelemetryScheduler {
    pub fn new(
        broadcaster: Arc<dyn Broadcaster>,
        readings: Arc<SensorReadings>,
        interval: Duration,
    ) -> Self {
        Self {
            broadcaster,
            readings,
            interval,
        }
    }

    /// Draw one reading and broadcast it.
    ///
    /// Returns the number of connections that accepted the message; zero
    /// when nobody is connected.
    pub async fn tick(&self) -> usize {
        let message = self.readings.next_reading();
        let delivered = self.broadcaster.broadcast(&message).await;
        tracing::debug!(delivered, reading = %message, "Telemetry broadcast");
        delivered
    }

    /// Run until the shutdown flag is set.
    ///
    /// The first reading goes out one full interval after the loop starts.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs_f64(), "Telemetry scheduler started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }

        tracing::info!("Telemetry scheduler stopped");
    }

    /// Spawn [`run`](Self::run) on the runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
