//! Calorie estimation for meal descriptions.

use std::sync::{Arc, LazyLock};

use brain_core::{Brain, GenerationRequest};
use regex::Regex;
use tracing::{debug, warn};

use super::quantity::extract_quantities;
use crate::error::ToolError;

/// Value logged when no estimate could be produced.
pub const FALLBACK_CALORIES: i64 = 150;

/// Lowest plausible estimate for one meal entry.
pub const MIN_MEAL_CALORIES: i64 = 5;

/// Highest plausible estimate for one meal entry.
pub const MAX_MEAL_CALORIES: i64 = 1200;

const ESTIMATOR_SYSTEM_PROMPT: &str = "Ты диетолог и считаешь калорийность еды. \
Овощи, зелень, огурцы, помидоры, листовые салаты и несладкие напитки почти пустые: \
не больше 50 ккал на 100 г. Сладости, масла, орехи, жареное, выпечка и хлеб плотные: \
обычно от 250 до 700 ккал на 100 г. Если количество не указано, считай обычную порцию. \
Ответь одним целым числом килокалорий, без единиц и пояснений.";

static INTEGER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"-?\d+").ok());

/// Where an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    /// Parsed from the model's answer (after clamping).
    Model,
    /// The fixed fallback after a failure.
    Fallback,
}

/// A calorie estimate ready to be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalorieEstimate {
    pub calories: i64,
    pub source: EstimateSource,
}

/// Estimates meal calories with one model call.
#[derive(Clone)]
pub struct CalorieEstimator {
    brain: Arc<dyn Brain>,
}

impl CalorieEstimator {
    /// Create an estimator backed by the given brain.
    pub fn new(brain: Arc<dyn Brain>) -> Self {
        Self { brain }
    }

    /// Build the model request for a description.
    pub fn build_request(description: &str) -> GenerationRequest {
        let quantities = extract_quantities(description);
        let prompt = format!(
            "Блюдо: {}\nКоличество: {}",
            description.trim(),
            quantities.describe()
        );
        GenerationRequest::new(ESTIMATOR_SYSTEM_PROMPT, prompt).with_temperature(0.0)
    }

    /// Pull the first integer out of a model answer and clamp it.
    pub fn parse_calories(answer: &str) -> Result<i64, ToolError> {
        let regex = INTEGER
            .as_ref()
            .ok_or_else(|| ToolError::NoNumber(answer.to_string()))?;

        let raw = regex
            .find(answer)
            .ok_or_else(|| ToolError::NoNumber(answer.to_string()))?;

        // Digits beyond i64 still mean "a lot".
        let value = raw.as_str().parse::<i64>().unwrap_or(MAX_MEAL_CALORIES);
        Ok(value.clamp(MIN_MEAL_CALORIES, MAX_MEAL_CALORIES))
    }

    /// Estimate calories, reporting why it failed.
    pub async fn estimate(&self, description: &str) -> Result<i64, ToolError> {
        let answer = self.brain.generate(Self::build_request(description)).await?;
        let calories = Self::parse_calories(&answer)?;
        debug!(calories, "Estimated meal calories");
        Ok(calories)
    }

    /// Estimate calories, substituting [`FALLBACK_CALORIES`] on any failure.
    pub async fn estimate_or_fallback(&self, description: &str) -> CalorieEstimate {
        match self.estimate(description).await {
            Ok(calories) => CalorieEstimate {
                calories,
                source: EstimateSource::Model,
            },
            Err(e) => {
                warn!(error = %e, "CALORIE_ESTIMATE_FALLBACK");
                CalorieEstimate {
                    calories: FALLBACK_CALORIES,
                    source: EstimateSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_brain::{FailingBrain, ScriptedBrain};

    #[test]
    fn test_parse_first_integer_and_clamp() {
        assert_eq!(CalorieEstimator::parse_calories("320").unwrap(), 320);
        assert_eq!(CalorieEstimator::parse_calories("Примерно 180 ккал, может 200").unwrap(), 180);
        assert_eq!(CalorieEstimator::parse_calories("2").unwrap(), MIN_MEAL_CALORIES);
        assert_eq!(CalorieEstimator::parse_calories("-40").unwrap(), MIN_MEAL_CALORIES);
        assert_eq!(CalorieEstimator::parse_calories("5000").unwrap(), MAX_MEAL_CALORIES);
        assert_eq!(
            CalorieEstimator::parse_calories("99999999999999999999999").unwrap(),
            MAX_MEAL_CALORIES
        );
    }

    #[test]
    fn test_parse_without_number() {
        assert!(matches!(
            CalorieEstimator::parse_calories("не знаю"),
            Err(ToolError::NoNumber(_))
        ));
    }

    #[test]
    fn test_request_carries_quantities() {
        let request = CalorieEstimator::build_request("  2 яйца и 100 мл молока ");
        assert!(request.prompt.starts_with("Блюдо: 2 яйца и 100 мл молока\n"));
        assert!(request.prompt.contains("мл=100"));
        assert!(request.prompt.contains("штуки=2"));
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.system.contains("50 ккал"));
    }

    #[tokio::test]
    async fn test_estimate_from_model() {
        let brain = Arc::new(ScriptedBrain::new().with_reply("Около 155"));
        let estimator = CalorieEstimator::new(brain.clone());

        let estimate = estimator.estimate_or_fallback("2 яйца").await;
        assert_eq!(estimate.calories, 155);
        assert_eq!(estimate.source, EstimateSource::Model);
        assert_eq!(brain.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_generation_failure() {
        let estimator = CalorieEstimator::new(Arc::new(FailingBrain::new()));

        assert!(matches!(
            estimator.estimate("плов").await,
            Err(ToolError::Generation(_))
        ));

        let estimate = estimator.estimate_or_fallback("плов").await;
        assert_eq!(estimate.calories, FALLBACK_CALORIES);
        assert_eq!(estimate.source, EstimateSource::Fallback);
    }

    #[tokio::test]
    async fn test_fallback_on_non_numeric_answer() {
        let brain = Arc::new(ScriptedBrain::new().with_reply("Сложно сказать"));
        let estimator = CalorieEstimator::new(brain);

        let estimate = estimator.estimate_or_fallback("что-то вкусное").await;
        assert_eq!(estimate.calories, FALLBACK_CALORIES);
    }

    #[tokio::test]
    async fn test_estimates_always_in_range() {
        let answers = ["0", "1", "5", "700", "1200", "1201", "-3", "12345"];
        let brain = Arc::new(ScriptedBrain::new().with_replies(answers));
        let estimator = CalorieEstimator::new(brain);

        for _ in answers {
            let estimate = estimator.estimate_or_fallback("еда").await;
            assert!((MIN_MEAL_CALORIES..=MAX_MEAL_CALORIES).contains(&estimate.calories));
        }
    }
}
