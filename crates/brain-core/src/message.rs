//! Transport-neutral message types.

use serde::{Deserialize, Serialize};

/// A text message received from a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque user identifier assigned by the transport.
    pub sender: String,
    /// Message text.
    pub text: String,
    /// Transport timestamp (unix millis, 0 when unknown).
    pub timestamp: u64,
}

impl InboundMessage {
    /// Create a direct message from a user.
    pub fn direct(sender: impl Into<String>, text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
        }
    }
}

/// A text message to deliver to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Opaque user identifier of the recipient.
    pub recipient: String,
    /// Message text, ready for display.
    pub text: String,
}

impl OutboundMessage {
    /// Create a message addressed to an arbitrary recipient.
    pub fn new(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
        }
    }

    /// Create a reply to an inbound message.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self::new(message.sender.clone(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_goes_back_to_sender() {
        let inbound = InboundMessage::direct("42", "привет", 1);
        let reply = OutboundMessage::reply_to(&inbound, "здравствуй");
        assert_eq!(reply.recipient, "42");
        assert_eq!(reply.text, "здравствуй");
    }
}
