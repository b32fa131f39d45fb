//! Relay domain: inbound message classification and session lifecycle.

pub mod inbound;
pub mod session_state;

pub use inbound::{InboundMessage, DEVICE_PREFIX};
pub use session_state::SessionState;
