//! Relay behaviour configuration

use serde::Deserialize;

use crate::adapters::websocket::DEFAULT_OUTBOUND_BUFFER;

use super::error::ValidationError;

/// Chat relay configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Include the sender when broadcasting its chat message
    #[serde(default = "default_echo_to_sender")]
    pub echo_to_sender: bool,

    /// Per-connection outbound queue depth
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl RelayConfig {
    /// Validate relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outbound_buffer == 0 {
            return Err(ValidationError::InvalidOutboundBuffer);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            echo_to_sender: default_echo_to_sender(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn default_echo_to_sender() -> bool {
    true
}

fn default_outbound_buffer() -> usize {
    DEFAULT_OUTBOUND_BUFFER
}
