//! Message front door for the fitness coach.
//!
//! This crate sits between a chat transport and the
//! [`Orchestrator`](orchestrator::Orchestrator). For every message it
//! answers slash commands and the reset phrase, saves one-line profiles
//! ("Юрий, 38, 88, 175"), and passes everything else to the orchestrator,
//! guarding the reply against leaked tool payloads.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use database::Database;
//! use message_listener::{stdin_messages, ConsoleSender, MessageProcessor};
//! use mock_brain::EchoBrain;
//! use orchestrator::{MemorySettings, Orchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let database = Database::in_memory().await?;
//! let orchestrator = Orchestrator::new(Arc::new(EchoBrain::new()), database, MemorySettings::default());
//!
//! let processor = MessageProcessor::with_defaults(Arc::new(orchestrator), Arc::new(ConsoleSender::stdout()));
//! processor.run(stdin_messages()).await;
//! # Ok(())
//! # }
//! ```

mod commands;
mod console;
mod onboarding;
mod processor;

pub use commands::{Command, HELP_TEXT, REMIND_OFF_TEXT, REMIND_ON_TEXT, RESET_TEXT, START_TEXT};
pub use console::{line_messages, parse_console_line, stdin_messages, ConsoleSender, CONSOLE_USER};
pub use onboarding::ProfileLine;
pub use processor::{
    guard_reply, MessageProcessor, ProcessResult, ProcessorConfig, ProcessorError,
    NOT_UNDERSTOOD_TEXT, PROCESSING_ERROR_TEXT,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
