//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, error types, and the state machine trait
//! that form the vocabulary of the relay domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::DomainError;
pub use ids::ConnectionId;
pub use state_machine::StateMachine;
