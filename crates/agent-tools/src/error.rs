//! Error types for tool operations.

use brain_core::BrainError;
use thiserror::Error;

/// Errors that can occur while running a model-backed tool.
///
/// Callers substitute a fallback for every variant; the variant only tells
/// the logs why.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The generation call failed.
    #[error("generation failed: {0}")]
    Generation(#[from] BrainError),

    /// The model answered without the number we asked for.
    #[error("no number in model output: {0:?}")]
    NoNumber(String),

    /// The model answered with blank text.
    #[error("model returned empty text")]
    EmptyOutput,
}
