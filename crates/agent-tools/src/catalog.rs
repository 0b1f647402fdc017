//! The closed set of actions the agent may choose from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tools::numbers::first_number;

/// An action the agent can name in its `Action:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentAction {
    LogMeal,
    RemainingCalories,
    LogWeight,
    CreatePlan,
    Workout,
    Progress,
    ShowWeight,
    ShowGoal,
}

/// An action bound to its input, ready to execute.
///
/// Plan and workout inputs stay as text; they are parsed by the executor,
/// which knows the user's current weight.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionCall {
    LogMeal { description: String },
    RemainingCalories,
    LogWeight { weight: Option<f64> },
    CreatePlan { request: String },
    Workout { request: String },
    Progress,
    ShowWeight,
    ShowGoal,
}

impl AgentAction {
    /// Every action, in catalog order.
    pub const ALL: [AgentAction; 8] = [
        AgentAction::LogMeal,
        AgentAction::RemainingCalories,
        AgentAction::LogWeight,
        AgentAction::CreatePlan,
        AgentAction::Workout,
        AgentAction::Progress,
        AgentAction::ShowWeight,
        AgentAction::ShowGoal,
    ];

    /// Name the agent uses for this action.
    pub fn name(self) -> &'static str {
        match self {
            AgentAction::LogMeal => "log_meal",
            AgentAction::RemainingCalories => "get_remaining_calories",
            AgentAction::LogWeight => "log_weight",
            AgentAction::CreatePlan => "create_plan",
            AgentAction::Workout => "workout",
            AgentAction::Progress => "progress",
            AgentAction::ShowWeight => "show_weight",
            AgentAction::ShowGoal => "show_goal",
        }
    }

    /// Documentation shown to the agent.
    pub fn description(self) -> &'static str {
        match self {
            AgentAction::LogMeal => {
                "Записать приём пищи и оценить калории. Вход: описание еды, например «2 яйца» или «борщ 300 мл»."
            }
            AgentAction::RemainingCalories => {
                "Показать, сколько калорий съедено сегодня и сколько осталось. Вход не нужен."
            }
            AgentAction::LogWeight => "Сохранить вес пользователя. Вход: вес в кг, например «88.5».",
            AgentAction::CreatePlan => {
                "Предложить план похудения. Вход: цель, например «цель 75» или «на 7 кг за 2 месяца»."
            }
            AgentAction::Workout => {
                "Составить тренировку. Вход: пожелания, например «60 минут, кардио, средний уровень»."
            }
            AgentAction::Progress => "Показать прогресс по весу. Вход не нужен.",
            AgentAction::ShowWeight => "Показать текущий вес из профиля. Вход не нужен.",
            AgentAction::ShowGoal => "Показать текущую дневную цель по калориям. Вход не нужен.",
        }
    }

    /// Resolve an agent-supplied name. Tolerates case, quotes and padding.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .to_lowercase();
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Bind raw agent input to this action.
    pub fn bind(self, input: &str) -> ActionCall {
        let input = input.trim();
        match self {
            AgentAction::LogMeal => ActionCall::LogMeal {
                description: input.to_string(),
            },
            AgentAction::RemainingCalories => ActionCall::RemainingCalories,
            AgentAction::LogWeight => ActionCall::LogWeight {
                weight: first_number(input),
            },
            AgentAction::CreatePlan => ActionCall::CreatePlan {
                request: input.to_string(),
            },
            AgentAction::Workout => ActionCall::Workout {
                request: input.to_string(),
            },
            AgentAction::Progress => ActionCall::Progress,
            AgentAction::ShowWeight => ActionCall::ShowWeight,
            AgentAction::ShowGoal => ActionCall::ShowGoal,
        }
    }
}

impl fmt::Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ActionCall {
    /// The action this call belongs to.
    pub fn action(&self) -> AgentAction {
        match self {
            ActionCall::LogMeal { .. } => AgentAction::LogMeal,
            ActionCall::RemainingCalories => AgentAction::RemainingCalories,
            ActionCall::LogWeight { .. } => AgentAction::LogWeight,
            ActionCall::CreatePlan { .. } => AgentAction::CreatePlan,
            ActionCall::Workout { .. } => AgentAction::Workout,
            ActionCall::Progress => AgentAction::Progress,
            ActionCall::ShowWeight => AgentAction::ShowWeight,
            ActionCall::ShowGoal => AgentAction::ShowGoal,
        }
    }
}

/// Render the catalog as "- name: description" lines.
pub fn render_catalog() -> String {
    AgentAction::ALL
        .iter()
        .map(|action| format!("- {}: {}", action.name(), action.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
