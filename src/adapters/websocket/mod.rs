//! WebSocket adapters for the chat relay.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   text frame   ┌───────────────┐
//! │  ws session  │ ─────────────► │ MessageRouter │
//! │  (per conn)  │                └───────────────┘
//! └──────────────┘                   │         │
//!        ▲                     chat  │         │ /device
//!        │ writer task               ▼         ▼
//! ┌─────────────────────────────────────┐  DeviceSimulator
//! │         ConnectionRegistry          │◄── TelemetryScheduler
//! │  conn-a queue  conn-b queue  ...    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`registry`] - Live connection set with best-effort broadcast
//! - [`session`] - Per-connection lifecycle (register, close, unregister)
//! - [`handler`] - Axum WebSocket upgrade handler and receive loop

pub mod handler;
pub mod registry;
pub mod session;

pub use handler::{websocket_router, ws_handler, RelayState};
pub use registry::{ConnectionHandle, ConnectionRegistry, DEFAULT_OUTBOUND_BUFFER};
pub use session::{CloseReason, ConnectionSession};
