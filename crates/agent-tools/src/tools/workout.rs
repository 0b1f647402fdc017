//! Workout routine generation.

use std::fmt;
use std::sync::{Arc, LazyLock};

use brain_core::{Brain, GenerationRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ToolError;

/// Durations we recognize, checked largest first.
const DURATIONS: [u32; 5] = [90, 75, 60, 45, 30];

const DEFAULT_DURATION: u32 = 45;

const WORKOUT_SYSTEM_PROMPT: &str = "Ты тренер. Дай чёткий план тренировки из трёх частей: \
Разминка, Основная часть, Заминка. Коротко, пунктами, без Markdown.";

static DIGIT_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+").ok());

/// Training experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for WorkoutLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkoutLevel::Beginner => "начинающий",
            WorkoutLevel::Intermediate => "средний",
            WorkoutLevel::Advanced => "продвинутый",
        };
        f.write_str(label)
    }
}

/// What the session should focus on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutGoal {
    WeightLoss,
    Strength,
    Cardio,
    General,
}

impl fmt::Display for WorkoutGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkoutGoal::WeightLoss => "похудение",
            WorkoutGoal::Strength => "набор силы",
            WorkoutGoal::Cardio => "кардио",
            WorkoutGoal::General => "общая физическая форма",
        };
        f.write_str(label)
    }
}

/// Parameters extracted from the user's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRequest {
    pub duration_minutes: u32,
    pub level: WorkoutLevel,
    pub goal: WorkoutGoal,
}

impl Default for WorkoutRequest {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_DURATION,
            level: WorkoutLevel::Beginner,
            goal: WorkoutGoal::General,
        }
    }
}

fn parse_duration(text: &str) -> u32 {
    let Some(regex) = DIGIT_RUN.as_ref() else {
        return DEFAULT_DURATION;
    };

    let runs: Vec<&str> = regex.find_iter(text).map(|m| m.as_str()).collect();
    DURATIONS
        .into_iter()
        .find(|d| runs.iter().any(|run| *run == d.to_string()))
        .unwrap_or(DEFAULT_DURATION)
}

/// Word stems that ask for strength work. Matched at word start so that
/// "бессилие" or "усилие" do not count.
const STRENGTH_STEMS: [&str; 5] = ["сила", "силу", "силы", "силой", "силов"];

fn mentions_strength(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| STRENGTH_STEMS.iter().any(|stem| word.starts_with(stem)))
}

/// Extract duration, level and goal from free text.
pub fn parse_workout_request(text: &str) -> WorkoutRequest {
    let text = text.to_lowercase();

    let level = if text.contains("средн") {
        WorkoutLevel::Intermediate
    } else if text.contains("продвинут") || text.contains("опыт") {
        WorkoutLevel::Advanced
    } else {
        WorkoutLevel::Beginner
    };

    let goal = if text.contains("похуд") {
        WorkoutGoal::WeightLoss
    } else if mentions_strength(&text) {
        WorkoutGoal::Strength
    } else if text.contains("кардио") {
        WorkoutGoal::Cardio
    } else {
        WorkoutGoal::General
    };

    WorkoutRequest {
        duration_minutes: parse_duration(&text),
        level,
        goal,
    }
}

/// Routine used whenever generation fails.
pub fn static_routine() -> &'static str {
    "Разминка (5 мин): махи руками, круговые плечами, лёгкие приседания\n\
     Основная часть (35 мин): приседания 4×12, отжимания 4×10, планка 3×40с, выпады 3×10 на ногу, пресс 3×15\n\
     Заминка (5 мин): растяжка ног и спины"
}

/// Generates workout routines with a static fallback.
#[derive(Clone)]
pub struct WorkoutGenerator {
    brain: Arc<dyn Brain>,
}

impl WorkoutGenerator {
    /// Create a generator backed by the given brain.
    pub fn new(brain: Arc<dyn Brain>) -> Self {
        Self { brain }
    }

    /// Build the model request for parsed parameters.
    pub fn build_request(request: &WorkoutRequest) -> GenerationRequest {
        let prompt = format!(
            "Составь тренировку на {} минут. Уровень: {}. Цель: {}.",
            request.duration_minutes, request.level, request.goal
        );
        GenerationRequest::new(WORKOUT_SYSTEM_PROMPT, prompt).with_temperature(0.2)
    }

    /// Generate a routine, reporting why it failed.
    pub async fn try_generate(&self, request: &WorkoutRequest) -> Result<String, ToolError> {
        let text = self.brain.generate(Self::build_request(request)).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ToolError::EmptyOutput);
        }
        Ok(text.to_string())
    }

    /// Generate a routine for free text, falling back to [`static_routine`].
    pub async fn generate(&self, text: &str) -> String {
        let request = parse_workout_request(text);
        debug!(
            duration = request.duration_minutes,
            level = %request.level,
            goal = %request.goal,
            "Generating workout"
        );

        match self.try_generate(&request).await {
            Ok(routine) => routine,
            Err(e) => {
                warn!(error = %e, "WORKOUT_FALLBACK");
                static_routine().to_string()
            }
        }
    }
}
