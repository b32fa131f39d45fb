//! Domain layer containing the relay's pure logic and value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, errors, state machine trait)
//! - `device` - Simulated device, command tokens, sensor readings
//! - `relay` - Inbound message classification and session lifecycle

pub mod device;
pub mod foundation;
pub mod relay;
