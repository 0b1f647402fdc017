//! Intent classification.
//!
//! Stages, first match wins:
//!
//! 1. Exact confirm / cancel words for the pending plan.
//! 2. Fast-path plan request ("цель" or "похуд" + "кг", with a number).
//! 3. [`INTENT_RULES`], an ordered substring list.
//! 4. Everything else goes to the agent.
//!
//! Rule order matters where needles overlap. "мой вес" and "вес?" both
//! contain "вес" and must be checked before "вес ", which logs a weight;
//! "я съел" is listed before "съел" even though either would fire.
//! "завтрак", "обед" and "ужин" share no substring with "вес".

use agent_tools::{has_number, AgentAction};

const CONFIRM_WORDS: [&str; 5] = ["да", "ок", "окей", "согласен", "подтверждаю"];
const CANCEL_WORDS: [&str; 4] = ["нет", "не", "отмена", "отменить"];

/// Where a message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Apply the pending plan.
    Confirm,
    /// Drop the pending plan.
    Cancel,
    /// Build and propose a plan from the text.
    ProposePlan,
    /// Run one action directly with the whole text as input.
    Rule(AgentAction),
    /// Let the agent decide.
    Delegate,
}

/// A keyword rule: a lowercase substring and the action it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub needle: &'static str,
    pub action: AgentAction,
}

const fn rule(needle: &'static str, action: AgentAction) -> IntentRule {
    IntentRule { needle, action }
}

/// Keyword rules, evaluated top to bottom.
pub const INTENT_RULES: [IntentRule; 17] = [
    rule("трениров", AgentAction::Workout),
    rule("прогресс", AgentAction::Progress),
    rule("остаток", AgentAction::RemainingCalories),
    rule("мой вес", AgentAction::ShowWeight),
    rule("вес?", AgentAction::ShowWeight),
    rule("моя цель", AgentAction::ShowGoal),
    rule("текущая цель", AgentAction::ShowGoal),
    rule("я съел", AgentAction::LogMeal),
    rule("съел", AgentAction::LogMeal),
    rule("я выпил", AgentAction::LogMeal),
    rule("выпил", AgentAction::LogMeal),
    rule("завтрак", AgentAction::LogMeal),
    rule("обед", AgentAction::LogMeal),
    rule("ужин", AgentAction::LogMeal),
    rule("перекус", AgentAction::LogMeal),
    rule("взвес", AgentAction::LogWeight),
    rule("вес ", AgentAction::LogWeight),
];

fn is_fast_plan(lower: &str) -> bool {
    if !has_number(lower) {
        return false;
    }
    lower.contains("цель") || (lower.contains("похуд") && lower.contains("кг"))
}

/// First keyword rule matching the lowercase text.
pub fn rule_intent(lower: &str) -> Option<AgentAction> {
    INTENT_RULES
        .iter()
        .find(|rule| lower.contains(rule.needle))
        .map(|rule| rule.action)
}

/// Classify a message.
pub fn classify(text: &str) -> Route {
    let lower = text.trim().to_lowercase();

    if CONFIRM_WORDS.contains(&lower.as_str()) {
        return Route::Confirm;
    }
    if CANCEL_WORDS.contains(&lower.as_str()) {
        return Route::Cancel;
    }

    if is_fast_plan(&lower) {
        return Route::ProposePlan;
    }

    match rule_intent(&lower) {
        Some(action) => Route::Rule(action),
        None => Route::Delegate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_and_cancel_words() {
        for word in ["да", " Да ", "ок", "окей", "согласен", "ПОДТВЕРЖДАЮ"] {
            assert_eq!(classify(word), Route::Confirm, "{word}");
        }
        for word in ["нет", "не", "Отмена", "отменить"] {
            assert_eq!(classify(word), Route::Cancel, "{word}");
        }
    }

    #[test]
    fn test_confirm_words_must_match_exactly() {
        assert_eq!(classify("да, съел"), Route::Rule(AgentAction::LogMeal));
        assert_eq!(classify("нет сил"), Route::Delegate);
    }

    #[test]
    fn test_fast_path_plan() {
        assert_eq!(classify("цель 75"), Route::ProposePlan);
        assert_eq!(classify("Хочу похудеть на 7 кг"), Route::ProposePlan);
        assert_eq!(classify("похудеть на 7"), Route::Delegate);
        assert_eq!(classify("цель"), Route::Delegate);
    }

    #[test]
    fn test_plan_wins_over_rules() {
        // "моя цель" is a show-goal rule, but a number makes it a plan request
        assert_eq!(classify("моя цель 70"), Route::ProposePlan);
        assert_eq!(classify("моя цель"), Route::Rule(AgentAction::ShowGoal));
    }

    #[test]
    fn test_show_weight_before_log_weight() {
        assert_eq!(classify("мой вес"), Route::Rule(AgentAction::ShowWeight));
        assert_eq!(classify("какой у меня вес?"), Route::Rule(AgentAction::ShowWeight));
        assert_eq!(classify("мой вес сейчас"), Route::Rule(AgentAction::ShowWeight));
        assert_eq!(classify("вес 85.4"), Route::Rule(AgentAction::LogWeight));
    }

    #[test]
    fn test_weigh_in_forms() {
        assert_eq!(classify("взвесился 85,4"), Route::Rule(AgentAction::LogWeight));
        assert_eq!(classify("Взвешивание: 84"), Route::Rule(AgentAction::LogWeight));
    }

    #[test]
    fn test_workout_before_meal() {
        assert_eq!(
            classify("тренировка после обеда"),
            Route::Rule(AgentAction::Workout)
        );
    }

    #[test]
    fn test_progress_before_weight() {
        assert_eq!(classify("прогресс по весу"), Route::Rule(AgentAction::Progress));
        assert_eq!(classify("прогресс: вес 80"), Route::Rule(AgentAction::Progress));
    }

    #[test]
    fn test_remaining_before_meal() {
        assert_eq!(
            classify("остаток после ужина"),
            Route::Rule(AgentAction::RemainingCalories)
        );
    }

    #[test]
    fn test_meal_before_weight() {
        assert_eq!(classify("съел вес шоколада"), Route::Rule(AgentAction::LogMeal));
        assert_eq!(classify("на завтрак взвесил овсянку"), Route::Rule(AgentAction::LogMeal));
    }

    #[test]
    fn test_show_goal_before_meal() {
        assert_eq!(
            classify("текущая цель на ужин"),
            Route::Rule(AgentAction::ShowGoal)
        );
    }

    #[test]
    fn test_meal_phrases() {
        for text in ["я съел 2 яйца", "выпил кефир", "я выпил чай", "перекус яблоко", "обед: борщ"] {
            assert_eq!(classify(text), Route::Rule(AgentAction::LogMeal), "{text}");
        }
    }

    #[test]
    fn test_meal_word_in_advice_request_still_logs() {
        // Substring rules cannot tell advice requests from reports
        assert_eq!(classify("дай пример полезного перекуса"), Route::Rule(AgentAction::LogMeal));
    }

    #[test]
    fn test_everything_else_delegates() {
        assert_eq!(classify("что приготовить?"), Route::Delegate);
        assert_eq!(classify("привет"), Route::Delegate);
    }

    #[test]
    fn test_rules_list_order() {
        let position = |needle: &str| INTENT_RULES.iter().position(|r| r.needle == needle);
        assert!(position("мой вес") < position("вес "));
        assert!(position("вес?") < position("вес "));
        assert!(position("я съел") < position("съел"));
        assert!(position("я выпил") < position("выпил"));
    }
}
