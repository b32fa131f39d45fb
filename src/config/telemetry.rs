//! Telemetry configuration

use std::time::Duration;

use serde::Deserialize;

use crate::domain::device::ReadingRange;

use super::error::ValidationError;

/// Telemetry scheduler and sensor reading configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Seconds between telemetry broadcasts
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Smallest generated sensor value (inclusive)
    #[serde(default = "default_min_value")]
    pub min_value: i64,

    /// Largest generated sensor value (inclusive)
    #[serde(default = "default_max_value")]
    pub max_value: i64,

    /// Fixed seed for the sensor random source; entropy when unset
    pub seed: Option<u64>,
}

impl TelemetryConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// The configured value range.
    pub fn reading_range(&self) -> Result<ReadingRange, ValidationError> {
        ReadingRange::new(self.min_value, self.max_value).map_err(|_| {
            ValidationError::InvalidReadingRange {
                min: self.min_value,
                max: self.max_value,
            }
        })
    }

    /// Validate telemetry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_secs == 0 {
            return Err(ValidationError::InvalidTelemetryInterval);
        }
        self.reading_range()?;
        Ok(())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            min_value: default_min_value(),
            max_value: default_max_value(),
            seed: None,
        }
    }
}

fn default_interval_secs() -> u64 {
    10
}

fn default_min_value() -> i64 {
    0
}

fn default_max_value() -> i64 {
    100
}
