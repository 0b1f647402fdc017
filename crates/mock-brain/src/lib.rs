//! Mock brain implementations for testing.
//!
//! This crate provides test doubles for the `Brain` trait:
//! - `ScriptedBrain` - Answers from rules, a queue, then a fallback, and records requests
//! - `FailingBrain` - Always fails, counting calls
//! - `EchoBrain` - Echoes the prompt back
//! - `DelayedBrain` - Wraps another brain with artificial delay
//!
//! For production use, see the `openai-brain` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, GenerationRequest, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::new().with_reply("320");
//!
//!     let text = brain.generate(GenerationRequest::new("Ты диетолог.", "Блюдо: плов")).await?;
//!     assert_eq!(text, "320");
//!     assert_eq!(brain.call_count(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
