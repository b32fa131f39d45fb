//! Simulated device and its synthetic sensor readings.
//!
//! - [`command`] - `/device` command tokens
//! - [`simulator`] - The device itself (replies plus running flag)
//! - [`readings`] - Shared, seedable random source for sensor values

pub mod command;
pub mod readings;
pub mod simulator;

pub use command::DeviceCommand;
pub use readings::{format_reading, ReadingRange, SensorReadings};
pub use simulator::{DeviceSimulator, DEVICE_STARTED, DEVICE_STOPPED, UNRECOGNIZED_COMMAND};
