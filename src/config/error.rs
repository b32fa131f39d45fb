//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Host must not be empty")]
    EmptyHost,

    #[error("Telemetry interval must be at least one second")]
    InvalidTelemetryInterval,

    #[error("Telemetry min_value ({min}) exceeds max_value ({max})")]
    InvalidReadingRange { min: i64, max: i64 },

    #[error("Outbound buffer must hold at least one message")]
    InvalidOutboundBuffer,
}
