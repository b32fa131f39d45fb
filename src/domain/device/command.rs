//! Device command tokens.

use std::fmt;

/// A parsed `/device` command.
///
/// Parsing trims surrounding whitespace and compares case-insensitively.
/// Anything unrecognized, including the empty string, becomes `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    Status,
    Start,
    Stop,
    Unknown(String),
}

impl DeviceCommand {
    /// Tokens accepted by the simulator, in the order they are advertised.
    pub const VALID_TOKENS: [&'static str; 3] = ["status", "start", "stop"];

    pub fn parse(token: &str) -> Self {
        let normalized = token.trim().to_lowercase();
        match normalized.as_str() {
            "status" => DeviceCommand::Status,
            "start" => DeviceCommand::Start,
            "stop" => DeviceCommand::Stop,
            _ => DeviceCommand::Unknown(normalized),
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::Status => write!(f, "status"),
            DeviceCommand::Start => write!(f, "start"),
            DeviceCommand::Stop => write!(f, "stop"),
            DeviceCommand::Unknown(token) => write!(f, "unknown({})", token),
        }
    }
}
