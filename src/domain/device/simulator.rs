//! Simulated IoT device.
//!
//! Maps a command token to a canned reply and holds a single running flag.
//! `status` reports a fresh sensor reading regardless of the flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::command::DeviceCommand;
use super::readings::SensorReadings;

/// Reply to `/device start`.
pub const DEVICE_STARTED: &str = "Device started.";

/// Reply to `/device stop`.
pub const DEVICE_STOPPED: &str = "Device stopped.";

/// Reply to any unrecognized or empty device command.
pub const UNRECOGNIZED_COMMAND: &str =
    "Unrecognized device command. Valid commands: status, start, stop.";

/// The simulated device.
///
/// Starts in the stopped state. The running flag is an atomic, so a single
/// simulator can be shared across every connection session.
pub struct DeviceSimulator {
    running: AtomicBool,
    readings: Arc<SensorReadings>,
}

impl DeviceSimulator {
    /// Creates a stopped device that draws `status` values from `readings`.
    pub fn new(readings: Arc<SensorReadings>) -> Self {
        Self {
            running: AtomicBool::new(false),
            readings,
        }
    }

    /// Parses `token` and executes it.
    pub fn handle(&self, token: &str) -> String {
        self.execute(DeviceCommand::parse(token))
    }

    /// Executes an already parsed command and returns the reply text.
    pub fn execute(&self, command: DeviceCommand) -> String {
        match command {
            DeviceCommand::Status => self.readings.next_reading(),
            DeviceCommand::Start => {
                if !self.running.swap(true, Ordering::SeqCst) {
                    tracing::info!("Simulated device started");
                }
                DEVICE_STARTED.to_string()
            }
            DeviceCommand::Stop => {
                if self.running.swap(false, Ordering::SeqCst) {
                    tracing::info!("Simulated device stopped");
                }
                DEVICE_STOPPED.to_string()
            }
            DeviceCommand::Unknown(token) => {
                tracing::debug!(token = %token, "Unrecognized device command");
                UNRECOGNIZED_COMMAND.to_string()
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
