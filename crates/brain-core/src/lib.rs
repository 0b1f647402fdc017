//! Core trait and types for text-generation backends.
//!
//! This crate provides the shared interface between the coach core and the
//! model that writes free text for it. It defines:
//!
//! - [`Brain`] - The trait every text-generation backend implements
//! - [`GenerationRequest`] - A (system instruction, prompt, temperature) triple
//! - [`InboundMessage`] / [`OutboundMessage`] - Transport-neutral chat messages
//! - [`ConversationHistory`] - Bounded per-user turn log with LRU eviction
//! - [`BrainError`] - Error types for generation calls
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
//!
//! struct ConstantBrain;
//!
//! #[async_trait]
//! impl Brain for ConstantBrain {
//!     async fn generate(&self, _request: GenerationRequest) -> Result<String, BrainError> {
//!         Ok("42".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "ConstantBrain"
//!     }
//! }
//! ```

mod error;
mod history;
mod message;
mod prompt;
mod trait_def;

pub use error::BrainError;
pub use history::{ConversationHistory, Turn};
pub use message::{InboundMessage, OutboundMessage};
pub use prompt::{hash_prompt, prompt_fingerprint};
pub use trait_def::{Brain, GenerationRequest};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
