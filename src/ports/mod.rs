//! Ports - Interfaces between the relay logic and its transport.
//!
//! Following hexagonal architecture, ports define the contracts that
//! adapters implement.
//!
//! - `Broadcaster` - Unicast and best-effort fan-out to connected clients

mod broadcaster;

pub use broadcaster::{Broadcaster, DeliveryError};
