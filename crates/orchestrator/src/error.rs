//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that end an agent run. The router answers with small talk instead.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The generation call failed.
    #[error("agent generation failed: {0}")]
    Generation(#[from] BrainError),

    /// No final answer within the iteration budget.
    #[error("agent gave no final answer after {0} iterations")]
    IterationLimit(usize),

    /// A chosen action failed to execute.
    #[error("agent action {action} failed: {reason}")]
    Action { action: String, reason: String },
}

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Storage failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Brain processing failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// The agent loop failed.
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}
