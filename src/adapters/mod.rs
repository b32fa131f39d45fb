//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the relay to the outside world:
//! - `websocket` - Connection registry, sessions, and the `/ws` handler
//! - `http` - Server assembly, lifecycle, and the reference page

pub mod http;
pub mod websocket;

pub use http::{RelayServer, ServerError};
pub use websocket::{ConnectionHandle, ConnectionRegistry, RelayState};
