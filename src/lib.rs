//! ZinChat - Demonstration chat relay
//!
//! Clients connect over WebSocket and exchange plain-text messages that are
//! broadcast to everyone connected. Messages prefixed with `/device` are
//! routed to a simulated IoT device whose reply goes back to the sender
//! only, and a background task periodically broadcasts synthetic sensor
//! readings.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
