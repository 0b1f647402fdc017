//! Message orchestrator for the fitness coach.
//!
//! This crate provides the [`Orchestrator`] type, which turns one user
//! message into one reply: it classifies the text, runs the matching
//! action against the store, negotiates plans through a confirm / cancel
//! step, and hands everything else to a tool-selecting [`Agent`].
//!
//! # Features
//!
//! - Keyword routing with a fixed, ordered rule list ([`INTENT_RULES`])
//! - Plan proposals that are written only after "да" ([`PendingStore`])
//! - A reason/act loop over a closed action catalog ([`Agent`])
//! - Bounded per-user conversation memory ([`MemorySettings`])
//! - Weekly weigh-in reminders ([`WeeklyReminder`])
//!
//! # Architecture
//!
//! ```text
//! User message (from message-listener)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Ensure profile                                          │
//! │         ↓                                                   │
//! │  2. Classify:                                               │
//! │     • да / нет       → apply or drop the pending plan       │
//! │     • цель 75, ...   → compute plan, park it, preview       │
//! │     • keyword rule   → run one action                       │
//! │     • anything else  → agent → small talk → canned hint     │
//! │         ↓                                                   │
//! │  3. Record the turn in conversation memory                  │
//! │         ↓                                                   │
//! │  4. Return the reply                                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use database::Database;
//! use mock_brain::EchoBrain;
//! use orchestrator::{MemorySettings, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let database = Database::in_memory().await?;
//!     let orchestrator = Orchestrator::new(Arc::new(EchoBrain::new()), database, MemorySettings::default());
//!
//!     let reply = orchestrator.process("42", "взвесился 88").await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod actions;
mod agent;
mod error;
mod memory;
mod orchestrator;
mod pending;
mod reminder;
mod router;
mod sender;

// Public exports
pub use agent::{
    load_agent_prompt, parse_step, render_instructions, ActionExecutor, Agent, AgentStep,
    AGENT_PROMPT_FILE_ENV, DEFAULT_AGENT_PROMPT, DEFAULT_MAX_ITERATIONS,
};
pub use error::{AgentError, OrchestratorError};
pub use memory::MemorySettings;
pub use orchestrator::{Orchestrator, CANNED_REPLY, SMALL_TALK_SYSTEM_PROMPT};
pub use pending::{PendingPlan, PendingStore, DEFAULT_PENDING_TTL};
pub use reminder::{ReminderReport, ReminderSettings, WeeklyReminder, REMINDER_TEXT};
pub use router::{classify, rule_intent, IntentRule, Route, INTENT_RULES};
pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender};

// Re-export commonly used types from dependencies
pub use brain_core::{InboundMessage, OutboundMessage};
