//! Per-connection session lifecycle.

use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle of one client session.
///
/// ```text
/// Active ──► Closing ──► Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Registered and reading frames.
    #[default]
    Active,
    /// A close frame, read/write failure, or shutdown was observed.
    Closing,
    /// Unregistered; terminal.
    Closed,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!((self, target), (Active, Closing) | (Closing, Closed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Active => vec![Closing],
            Closing => vec![Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Active => "active",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
