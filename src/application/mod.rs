//! Application layer - Services that coordinate the domain and ports.
//!
//! - `router` - Per-message dispatch to chat broadcast or the device
//! - `telemetry` - Background periodic sensor broadcast

pub mod router;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use router::{MessageRouter, RouteOutcome};
pub use telemetry::{TelemetryScheduler, DEFAULT_TELEMETRY_INTERVAL};
