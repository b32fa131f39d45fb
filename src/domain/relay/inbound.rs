//! Classification of inbound text frames.

/// Literal prefix that routes a message to the simulated device.
pub const DEVICE_PREFIX: &str = "/device";

/// An inbound message after classification.
///
/// Chat text is kept byte-for-byte. Device commands carry the remainder
/// after the prefix with surrounding whitespace removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMessage<'a> {
    Chat(&'a str),
    DeviceCommand(&'a str),
}

impl<'a> InboundMessage<'a> {
    /// Classifies raw frame text.
    ///
    /// A device command is exactly `/device`, or `/device` followed by
    /// whitespace. The prefix match is case-sensitive; `/devices` or a
    /// leading space makes the frame ordinary chat.
    pub fn classify(text: &'a str) -> Self {
        match text.strip_prefix(DEVICE_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                InboundMessage::DeviceCommand(rest.trim())
            }
            _ => InboundMessage::Chat(text),
        }
    }

    pub fn is_device_command(&self) -> bool {
        matches!(self, InboundMessage::DeviceCommand(_))
    }
}
