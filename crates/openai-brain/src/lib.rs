//! OpenAI-compatible brain implementation.
//!
//! This crate provides a [`Brain`](brain_core::Brain) that talks to any
//! server exposing the `/chat/completions` endpoint (OpenAI, OpenRouter,
//! local gateways). Each call is stateless: the coach core owns the
//! conversation memory and sends fully assembled instructions.
//!
//! # Usage
//!
//! ```rust,no_run
//! use brain_core::{Brain, GenerationRequest};
//! use openai_brain::OpenAiBrain;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENAI_API_KEY, OPENAI_BASE_URL, OPENAI_MODEL, OPENAI_TEMPERATURE
//!     let brain = OpenAiBrain::from_env()?;
//!
//!     let text = brain
//!         .generate(GenerationRequest::new("Отвечай кратко.", "Привет!"))
//!         .await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};
