//! Tool-selecting agent.
//!
//! A bounded reason/act loop over the closed [`AgentAction`] catalog. Each
//! iteration asks the brain for either
//!
//! ```text
//! Action: <name>
//! Action Input: <text>
//! ```
//!
//! or `Final Answer: <text>`. Actions run through an [`ActionExecutor`] and
//! their result is appended as an `Observation:` line for the next turn.
//! Output that fits neither shape is fed back as an observation too and
//! costs one iteration.

use std::env;
use std::path::Path;
use std::sync::Arc;

use agent_tools::{render_catalog, ActionCall, AgentAction};
use async_trait::async_trait;
use brain_core::{prompt_fingerprint, Brain, GenerationRequest, Turn};
use tracing::{debug, info, warn};

use crate::error::{AgentError, OrchestratorError};

/// Default number of iterations before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Env var naming a file that replaces the built-in agent instruction.
pub const AGENT_PROMPT_FILE_ENV: &str = "COACH_AGENT_PROMPT_FILE";

/// Built-in agent instruction. `{catalog}` and `{action_names}` are filled in.
pub const DEFAULT_AGENT_PROMPT: &str = r#"Ты фитнес-ассистент: помогаешь с питанием, весом и тренировками.

Доступные действия:
{catalog}

Имена действий: {action_names}

Формат ответа. Либо вызови одно действие:
Thought: что нужно сделать
Action: имя действия
Action Input: вход для действия

Либо, если ответ уже известен:
Thought: ответ готов
Final Answer: ответ пользователю

После действия ты получишь строку Observation с результатом. Не пиши Observation сам.

Правила:
- Просьбы о советах («дай пример завтрака», «что приготовить», «идеи перекуса») не требуют действий: сразу дай Final Answer.
- log_meal только если пользователь прямо сообщает, что уже съел или выпил: «я съел X», «выпил X», «на завтрак было X».
- Вес («взвесился 85», «вес 84 кг») → log_weight.
- Цель или план («цель 75», «похудеть на 5 кг») → create_plan.
- Тренировка → workout. Остаток калорий → get_remaining_calories.
- Прогресс или текущий вес → progress или show_weight. Дневная цель по калориям → show_goal.
- Отвечай по-русски, кратко, без Markdown."#;

const FINAL_ANSWER: &str = "Final Answer:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const OBSERVATION: &str = "Observation:";

/// Executes actions chosen by the agent.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Run one bound action for a user and return its reply text.
    async fn execute(&self, user_id: &str, call: ActionCall) -> Result<String, OrchestratorError>;
}

/// One parsed model turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    /// The model is done.
    Final(String),
    /// The model wants an action run.
    Act { action: AgentAction, input: String },
    /// The output could not be used; the reason is shown to the model.
    Invalid(String),
}

/// Drop anything the model wrote from its own `Observation:` onwards.
fn truncate_at_observation(output: &str) -> &str {
    match output.find(OBSERVATION) {
        Some(index) => &output[..index],
        None => output,
    }
}

/// Parse one model turn.
pub fn parse_step(output: &str) -> AgentStep {
    let text = truncate_at_observation(output);
    let action_at = text.find(ACTION);

    if let Some(final_at) = text.find(FINAL_ANSWER) {
        if action_at.map_or(true, |a| a > final_at) {
            let answer = text[final_at + FINAL_ANSWER.len()..].trim();
            if answer.is_empty() {
                return AgentStep::Invalid("пустой Final Answer".to_string());
            }
            return AgentStep::Final(answer.to_string());
        }
    }

    let Some(action_at) = action_at else {
        return AgentStep::Invalid("нет строки Action или Final Answer".to_string());
    };

    let rest = &text[action_at + ACTION.len()..];
    let (name_part, input) = match rest.find(ACTION_INPUT) {
        Some(index) => (&rest[..index], &rest[index + ACTION_INPUT.len()..]),
        None => (rest, ""),
    };

    let name = name_part.lines().next().unwrap_or_default().trim();
    let input = input
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c == '«' || c == '»');

    match AgentAction::from_name(name) {
        Some(action) => AgentStep::Act {
            action,
            input: input.to_string(),
        },
        None => AgentStep::Invalid(format!("неизвестное действие «{}»", name)),
    }
}

/// Load the agent instruction template.
///
/// Priority:
/// 1. Contents of the file named by `COACH_AGENT_PROMPT_FILE` (if set and non-empty)
/// 2. Embedded default prompt
pub fn load_agent_prompt() -> String {
    if let Ok(path) = env::var(AGENT_PROMPT_FILE_ENV) {
        if let Some(prompt) = load_prompt_file(&path) {
            info!("Loaded agent prompt from {}", path);
            return prompt;
        }
        warn!("Agent prompt file {} is missing or empty, using default", path);
    }

    DEFAULT_AGENT_PROMPT.to_string()
}

fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Fill the catalog placeholders in an instruction template.
pub fn render_instructions(template: &str) -> String {
    let names = AgentAction::ALL
        .iter()
        .map(|action| action.name())
        .collect::<Vec<_>>()
        .join(", ");

    template
        .replace("{catalog}", &render_catalog())
        .replace("{action_names}", &names)
}

/// The reason/act loop.
pub struct Agent {
    brain: Arc<dyn Brain>,
    instructions: String,
    max_iterations: usize,
}

impl Agent {
    /// Create an agent with the built-in instruction.
    pub fn new(brain: Arc<dyn Brain>, max_iterations: usize) -> Self {
        Self::with_prompt(brain, DEFAULT_AGENT_PROMPT, max_iterations)
    }

    /// Create an agent with a custom instruction template.
    pub fn with_prompt(brain: Arc<dyn Brain>, template: &str, max_iterations: usize) -> Self {
        let instructions = render_instructions(template);
        debug!(
            fingerprint = %prompt_fingerprint(&instructions),
            "Agent instructions ready"
        );
        Self {
            brain,
            instructions,
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn build_prompt(input: &str, history: &[Turn], scratchpad: &str) -> String {
        let mut prompt = String::new();

        if !history.is_empty() {
            prompt.push_str("История диалога:\n");
            for turn in history {
                prompt.push_str(&format!(
                    "Пользователь: {}\nАссистент: {}\n",
                    turn.input, turn.output
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!("Question: {}\n", input));
        prompt.push_str(scratchpad);
        prompt.push_str("Thought:");
        prompt
    }

    /// Run the loop for one user message.
    pub async fn run(
        &self,
        user_id: &str,
        input: &str,
        history: &[Turn],
        executor: &dyn ActionExecutor,
    ) -> Result<String, AgentError> {
        let mut scratchpad = String::new();

        for iteration in 1..=self.max_iterations {
            let prompt = Self::build_prompt(input, history, &scratchpad);
            let request = GenerationRequest::new(self.instructions.as_str(), prompt);
            let output = self.brain.generate(request).await?;

            match parse_step(&output) {
                AgentStep::Final(answer) => {
                    info!(user_id = %user_id, iteration, "Agent finished");
                    return Ok(answer);
                }
                AgentStep::Act { action, input: action_input } => {
                    info!(user_id = %user_id, iteration, action = %action, "Agent chose action");

                    let observation = executor
                        .execute(user_id, action.bind(&action_input))
                        .await
                        .map_err(|e| AgentError::Action {
                            action: action.name().to_string(),
                            reason: e.to_string(),
                        })?;

                    scratchpad.push_str(&format!(
                        "{} {}\n{} {}\n{} {}\n",
                        ACTION, action, ACTION_INPUT, action_input, OBSERVATION, observation
                    ));
                }
                AgentStep::Invalid(reason) => {
                    debug!(user_id = %user_id, iteration, reason = %reason, "Agent output rejected");

                    scratchpad.push_str(truncate_at_observation(&output).trim());
                    scratchpad.push_str(&format!(
                        "\n{} Неверный формат: {}. Ответь строками «Action: <имя>» и «Action Input: <вход>» или строкой «Final Answer: <ответ>».\n",
                        OBSERVATION, reason
                    ));
                }
            }
        }

        Err(AgentError::IterationLimit(self.max_iterations))
    }
}
