//! Echo brain implementation - echoes the prompt back.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, GenerationRequest};

/// A brain that answers with the prompt it was given.
///
/// Useful for checking what a component actually asked for.
#[derive(Debug, Clone, Default)]
pub struct EchoBrain {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoBrain {
    /// Create a new EchoBrain with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoBrain with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Brain for EchoBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, request.prompt),
            None => request.prompt,
        })
    }

    fn name(&self) -> &str {
        "EchoBrain"
    }
}
