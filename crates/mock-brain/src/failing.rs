//! Failing brain implementation - every call errors.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use brain_core::{Brain, BrainError, GenerationRequest};

/// A brain whose every call fails with `ProcessingFailed`.
///
/// Counts calls so tests can assert that a code path never reached the model.
#[derive(Debug, Default)]
pub struct FailingBrain {
    reason: String,
    calls: AtomicUsize,
}

impl FailingBrain {
    /// Create a failing brain with a generic reason.
    pub fn new() -> Self {
        Self::with_reason("simulated outage")
    }

    /// Create a failing brain with a custom reason.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BrainError::ProcessingFailed(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails_and_counts() {
        let brain = FailingBrain::with_reason("down");

        for _ in 0..3 {
            let result = brain.generate(GenerationRequest::new("s", "p")).await;
            match result {
                Err(BrainError::ProcessingFailed(reason)) => assert_eq!(reason, "down"),
                other => panic!("unexpected result: {:?}", other),
            }
        }

        assert_eq!(brain.call_count(), 3);
        assert!(!brain.is_ready().await);
    }
}
