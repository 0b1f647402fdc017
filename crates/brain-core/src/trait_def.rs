//! The Brain trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BrainError;

/// A single text-generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instruction framing the task.
    pub system: String,
    /// The user-side instruction.
    pub prompt: String,
    /// Sampling temperature. `None` uses the backend default.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a request with the backend's default temperature.
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A trait for backends that turn an instruction into free text.
///
/// Implementations range from scripted test doubles to HTTP model clients.
/// This trait is object-safe and can be used as `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Generate text for the given request.
    ///
    /// There is no streaming; the call resolves once the whole answer is
    /// available.
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to accept requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_backend_temperature() {
        let request = GenerationRequest::new("system", "prompt");
        assert_eq!(request.system, "system");
        assert_eq!(request.prompt, "prompt");
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_request_with_temperature() {
        let request = GenerationRequest::new("s", "p").with_temperature(0.2);
        assert_eq!(request.temperature, Some(0.2));
    }
}
