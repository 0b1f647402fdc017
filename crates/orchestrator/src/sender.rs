//! Message sender trait and implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brain_core::OutboundMessage;

use crate::error::OrchestratorError;

/// Trait for delivering replies and reminders.
///
/// Abstracted to support different transports (console, chat APIs, tests).
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    ///
    /// # Arguments
    /// * `recipient` - Opaque user id
    /// * `text` - Message content
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError>;

    /// Send a prepared outbound message.
    async fn send(&self, message: &OutboundMessage) -> Result<(), OrchestratorError> {
        self.send_message(&message.recipient, &message.text).await
    }
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        (**self).send_message(recipient, text).await
    }
}

/// A no-op message sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_message(&self, _recipient: &str, _text: &str) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        tracing::info!("Sending message to {}: {}", recipient, text);
        Ok(())
    }
}

/// A sender that keeps every message and can refuse chosen recipients.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundMessage>>,
    refuse: Vec<String>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send to `recipient`.
    pub fn refusing(mut self, recipient: impl Into<String>) -> Self {
        self.refuse.push(recipient.into());
        self
    }

    /// Messages delivered so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        if self.refuse.iter().any(|r| r == recipient) {
            return Err(OrchestratorError::SendFailed(format!(
                "recipient {} refused",
                recipient
            )));
        }

        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(OutboundMessage::new(recipient, text));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sender() {
        let sender = NoOpSender;

        // Should not error
        sender.send_message("42", "test").await.unwrap();
    }

    #[tokio::test]
    async fn test_logging_sender() {
        let sender = LoggingSender;

        // Should not error
        sender.send_message("42", "test").await.unwrap();
        sender.send(&OutboundMessage::new("43", "test")).await.unwrap();
    }

    #[tokio::test]
    async fn test_recording_sender() {
        let sender = RecordingSender::new().refusing("blocked");

        sender.send_message("42", "привет").await.unwrap();
        let refused = sender.send_message("blocked", "привет").await;

        assert!(matches!(refused, Err(OrchestratorError::SendFailed(_))));
        assert_eq!(sender.sent(), vec![OutboundMessage::new("42", "привет")]);
    }

    #[tokio::test]
    async fn test_shared_sender() {
        let sender = Arc::new(RecordingSender::new());
        let shared = Arc::clone(&sender);

        shared.send(&OutboundMessage::new("7", "ok")).await.unwrap();
        assert_eq!(sender.sent().len(), 1);
    }
}
