//! Message processor that connects a transport to the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use brain_core::InboundMessage;
use chrono::{Local, NaiveDateTime};
use futures::{Stream, StreamExt};
use orchestrator::{MessageSender, Orchestrator, OrchestratorError};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::commands::{
    Command, HELP_TEXT, REMIND_OFF_TEXT, REMIND_ON_TEXT, RESET_TEXT, START_TEXT,
};
use crate::onboarding::ProfileLine;

/// Default timeout for handling one message (60 seconds).
const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(60);

/// Reply when a routed result looks like a raw tool payload.
pub const NOT_UNDERSTOOD_TEXT: &str = "Не понял. Пример: «цель 75» или «на 7 кг за 12 недель».";

/// Reply when handling failed.
pub const PROCESSING_ERROR_TEXT: &str = "Ошибка обработки. Попробуй ещё раз.";

/// Configuration for the message processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Timeout for handling one message. Longer runs are cancelled and
    /// answered with the processing-error reply.
    /// Default: 60 seconds.
    pub handler_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }
}

/// Errors that can occur during message processing.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Error from the orchestrator (storage, send).
    #[error("orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// Handling timed out.
    #[error("processing timed out after {0:?}")]
    Timeout(Duration),
}

/// Result of processing a single message.
#[derive(Debug)]
pub enum ProcessResult {
    /// A reply was sent.
    Responded { recipient: String, response: String },
    /// Message was skipped (e.g. empty text).
    Skipped { reason: String },
    /// Handling failed and the error reply could not be delivered either.
    Error(ProcessorError),
}

/// Replace replies that look like an unparsed tool payload.
pub fn guard_reply(reply: String) -> String {
    if reply.trim_start().starts_with('{') && reply.contains("\"tool\"") {
        warn!("Routed reply looked like a raw tool payload");
        NOT_UNDERSTOOD_TEXT.to_string()
    } else {
        reply
    }
}

/// A message processor: commands and onboarding first, then the orchestrator.
pub struct MessageProcessor<S: MessageSender> {
    orchestrator: Arc<Orchestrator>,
    sender: Arc<S>,
    config: ProcessorConfig,
}

impl<S: MessageSender> Clone for MessageProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            sender: Arc::clone(&self.sender),
            config: self.config.clone(),
        }
    }
}

impl<S: MessageSender> MessageProcessor<S> {
    /// Create a new message processor.
    pub fn new(orchestrator: Arc<Orchestrator>, sender: Arc<S>, config: ProcessorConfig) -> Self {
        Self {
            orchestrator,
            sender,
            config,
        }
    }

    /// Create a processor with default configuration.
    pub fn with_defaults(orchestrator: Arc<Orchestrator>, sender: Arc<S>) -> Self {
        Self::new(orchestrator, sender, ProcessorConfig::default())
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Build the reply for one message at a given instant.
    pub async fn handle_at(
        &self,
        user_id: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<String, ProcessorError> {
        let text = text.trim();

        if let Some(command) = Command::parse(text) {
            debug!(user_id = %user_id, command = ?command, "Command");
            return self.run_command(user_id, command, now).await;
        }

        if let Some(line) = ProfileLine::parse(text) {
            self.orchestrator
                .save_profile(user_id, &line.to_update(), line.weight, now)
                .await?;
            return Ok(line.summary());
        }

        let reply = self.orchestrator.process_at(user_id, text, now).await?;
        Ok(guard_reply(reply))
    }

    async fn run_command(
        &self,
        user_id: &str,
        command: Command,
        now: NaiveDateTime,
    ) -> Result<String, ProcessorError> {
        let reply = match command {
            Command::Start => {
                self.orchestrator.start(user_id, now).await?;
                START_TEXT
            }
            Command::Help => HELP_TEXT,
            Command::RemindOn => {
                self.orchestrator.set_reminders(user_id, true, now).await?;
                REMIND_ON_TEXT
            }
            Command::RemindOff => {
                self.orchestrator.set_reminders(user_id, false, now).await?;
                REMIND_OFF_TEXT
            }
            Command::Reset => {
                self.orchestrator.reset_user(user_id).await?;
                RESET_TEXT
            }
        };
        Ok(reply.to_string())
    }

    /// Handle a message and send the reply.
    ///
    /// Failures are logged and answered with a generic error reply.
    pub async fn process_message(&self, message: &InboundMessage) -> ProcessResult {
        if message.text.trim().is_empty() {
            return ProcessResult::Skipped {
                reason: "empty text".to_string(),
            };
        }

        info!(user_id = %message.sender, "Processing message");

        let now = Local::now().naive_local();
        let handled = timeout(
            self.config.handler_timeout,
            self.handle_at(&message.sender, &message.text, now),
        )
        .await
        .unwrap_or(Err(ProcessorError::Timeout(self.config.handler_timeout)));

        let response = match handled {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id = %message.sender, error = %e, "Processing failed");
                PROCESSING_ERROR_TEXT.to_string()
            }
        };

        match self.sender.send_message(&message.sender, &response).await {
            Ok(()) => ProcessResult::Responded {
                recipient: message.sender.clone(),
                response,
            },
            Err(e) => {
                error!(user_id = %message.sender, error = %e, "Failed to send reply");
                ProcessResult::Error(e.into())
            }
        }
    }
}

impl<S: MessageSender + 'static> MessageProcessor<S> {
    /// Handle every message of `stream`, each in its own task.
    ///
    /// Returns once the stream ends and every task has finished.
    pub async fn run<St>(self, stream: St)
    where
        St: Stream<Item = InboundMessage> + Send,
    {
        info!("Starting message processor");

        let mut tasks = JoinSet::new();
        let mut stream = std::pin::pin!(stream);

        while let Some(message) = stream.next().await {
            let processor = self.clone();
            tasks.spawn(async move {
                match processor.process_message(&message).await {
                    ProcessResult::Responded { recipient, response } => {
                        debug!("Responded to {}: {}", recipient, response);
                    }
                    ProcessResult::Skipped { reason } => debug!("Skipped: {}", reason),
                    ProcessResult::Error(e) => warn!("Error processing message: {}", e),
                }
            });

            // Reap finished tasks so the set does not grow without bound.
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    error!(error = %e, "Message task panicked");
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Message task panicked");
            }
        }

        info!("Message stream ended");
    }
}
