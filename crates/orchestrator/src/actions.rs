//! Action execution against the store and the tools.
//!
//! Every reply here is plain text ready for the user. Storage failures
//! propagate; model failures never do, the tools fall back locally.

use agent_tools::{
    calculate_plan, parse_plan_request, ActionCall, CalorieEstimator, PlanInput, WorkoutGenerator,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use database::{goal, meal, user, validation, weight, Database};
use tracing::{info, warn};

use crate::agent::ActionExecutor;
use crate::error::OrchestratorError;
use crate::pending::{PendingPlan, PendingStore};

/// Daily goal assumed when the profile has none.
const DEFAULT_GOAL_CALORIES: i64 = 2000;

pub(crate) const NOTHING_TO_CONFIRM: &str = "Нет действий для подтверждения.";
pub(crate) const NOTHING_TO_CANCEL: &str = "Отменять нечего.";
pub(crate) const CANCELLED: &str = "❎ Отменено. Ничего не сохранено.";
pub(crate) const WEIGHT_NOT_PARSED: &str = "Не смог распознать вес. Пример: «взвесился 85.4»";
pub(crate) const WEIGHT_FIRST: &str = "Сначала пришли текущий вес: «взвесился 88».";
pub(crate) const GOAL_BELOW_CURRENT: &str =
    "Нужно указать цель ниже текущего веса. Пример: «цель 75» или «на 10 кг за 12 недель».";

/// Executes actions for one message at a fixed instant.
pub(crate) struct Actions<'a> {
    pub database: &'a Database,
    pub estimator: &'a CalorieEstimator,
    pub workouts: &'a WorkoutGenerator,
    pub pending: &'a PendingStore,
    pub now: NaiveDateTime,
}

impl Actions<'_> {
    async fn goal_and_eaten(&self, user_id: &str) -> Result<(i64, i64), OrchestratorError> {
        let snapshot = user::get_snapshot(self.database.pool(), user_id, self.now.date()).await?;
        let goal = if snapshot.profile.goal_calories > 0 {
            snapshot.profile.goal_calories
        } else {
            DEFAULT_GOAL_CALORIES
        };
        Ok((goal, snapshot.calories_today))
    }

    pub async fn log_meal(&self, user_id: &str, description: &str) -> Result<String, OrchestratorError> {
        let clean = description.trim().to_lowercase();
        if clean.is_empty() {
            return Ok("Не понял, что ты съел. Пример: «я съел 2 яйца».".to_string());
        }

        let estimate = self.estimator.estimate_or_fallback(&clean).await;
        meal::add_meal(self.database.pool(), user_id, &clean, estimate.calories, self.now).await?;

        let (goal, eaten) = self.goal_and_eaten(user_id).await?;
        let remaining = (goal - eaten).max(0);

        info!(user_id = %user_id, calories = estimate.calories, source = ?estimate.source, "Logged meal");
        Ok(format!(
            "✅ Сохранено: {}\n📊 Калории: ~{} ккал\n📈 Сегодня: ~{}/{} ккал. Остаток: ~{} ккал",
            clean, estimate.calories, eaten, goal, remaining
        ))
    }

    pub async fn remaining_calories(&self, user_id: &str) -> Result<String, OrchestratorError> {
        let (goal, eaten) = self.goal_and_eaten(user_id).await?;
        let remaining = (goal - eaten).max(0);
        let used_pct = eaten * 100 / goal;

        Ok(format!(
            "📊 Сегодня потреблено: ~{} ккал\n📈 Остаток: ~{} ккал из {}\n💯 Использовано: {}%",
            eaten, remaining, goal, used_pct
        ))
    }

    pub async fn log_weight(&self, user_id: &str, value: Option<f64>) -> Result<String, OrchestratorError> {
        let Some(value) = value else {
            return Ok(WEIGHT_NOT_PARSED.to_string());
        };

        if let Err(e) = validation::validate_weight(value) {
            warn!(user_id = %user_id, error = %e, "Rejected weight");
            return Ok(format!(
                "Вес {} кг не похож на настоящий. Пример: «взвесился 85.4»",
                value
            ));
        }

        weight::add_weight(self.database.pool(), user_id, value, self.now).await?;
        Ok(format!("💾 Вес сохранён: {:.1} кг", value))
    }

    pub async fn progress(&self, user_id: &str) -> Result<String, OrchestratorError> {
        let profile = user::get_profile(self.database.pool(), user_id).await?;
        let Some(current) = profile.weight else {
            return Ok("Пока нет данных по прогрессу.".to_string());
        };

        let mut reply = format!("Текущий вес: {:.1} кг", current);
        if let Some(record) = goal::latest_goal(self.database.pool(), user_id).await? {
            let left = (current - record.target_weight).max(0.0);
            reply.push_str(&format!(
                "\n🎯 Цель: {:.1} кг, осталось {:.1} кг",
                record.target_weight, left
            ));
        }
        Ok(reply)
    }

    pub async fn show_weight(&self, user_id: &str) -> Result<String, OrchestratorError> {
        let profile = user::get_profile(self.database.pool(), user_id).await?;
        Ok(match profile.weight {
            Some(current) => format!("Текущий вес в профиле: {:.1} кг", current),
            None => "Пока не знаю. Отправь: «взвесился 88».".to_string(),
        })
    }

    pub async fn show_goal(&self, user_id: &str) -> Result<String, OrchestratorError> {
        let profile = user::get_profile(self.database.pool(), user_id).await?;
        Ok(if profile.goal_calories <= 0 {
            "Цель пока не установлена.".to_string()
        } else {
            format!("Текущий дневной калораж: {} ккал/день", profile.goal_calories)
        })
    }

    /// Compute a plan from the request text and park it until confirmed.
    pub async fn propose_plan(&self, user_id: &str, text: &str) -> Result<String, OrchestratorError> {
        let profile = user::get_profile(self.database.pool(), user_id).await?;
        let Some(current) = profile.weight.filter(|w| *w > 0.0) else {
            return Ok(WEIGHT_FIRST.to_string());
        };

        let request = parse_plan_request(text, current);
        let Some(target) = request.goal_weight.filter(|g| *g < current) else {
            return Ok(GOAL_BELOW_CURRENT.to_string());
        };

        let input = PlanInput::new(current, target)
            .with_weeks(request.weeks_hint)
            .with_speed(request.speed_hint)
            .with_height(profile.height)
            .with_age(profile.age.map(|age| age as f64));
        let plan = calculate_plan(&input);

        let proposal = PendingPlan::new(target, current, plan);
        let preview = render_preview(&proposal);
        self.pending.propose(user_id, proposal).await;

        info!(user_id = %user_id, target, "Proposed plan");
        Ok(preview)
    }

    /// Apply the pending plan, if any.
    pub async fn confirm(&self, user_id: &str) -> Result<String, OrchestratorError> {
        let pool = self.database.pool().clone();
        let now = self.now;

        let outcome = self
            .pending
            .confirm(user_id, |proposal| async move {
                goal::apply_goal(&pool, user_id, &proposal.to_goal(), now).await
            })
            .await?;

        Ok(match outcome {
            Some((proposal, _)) => render_applied(&proposal),
            None => NOTHING_TO_CONFIRM.to_string(),
        })
    }

    /// Drop the pending plan, if any.
    pub async fn cancel(&self, user_id: &str) -> String {
        if self.pending.cancel(user_id).await {
            CANCELLED.to_string()
        } else {
            NOTHING_TO_CANCEL.to_string()
        }
    }
}

#[async_trait]
impl ActionExecutor for Actions<'_> {
    async fn execute(&self, user_id: &str, call: ActionCall) -> Result<String, OrchestratorError> {
        match call {
            ActionCall::LogMeal { description } => self.log_meal(user_id, &description).await,
            ActionCall::RemainingCalories => self.remaining_calories(user_id).await,
            ActionCall::LogWeight { weight } => self.log_weight(user_id, weight).await,
            ActionCall::CreatePlan { request } => self.propose_plan(user_id, &request).await,
            ActionCall::Workout { request } => Ok(self.workouts.generate(&request).await),
            ActionCall::Progress => self.progress(user_id).await,
            ActionCall::ShowWeight => self.show_weight(user_id).await,
            ActionCall::ShowGoal => self.show_goal(user_id).await,
        }
    }
}

fn render_macros(proposal: &PendingPlan) -> String {
    format!(
        "🥗 Макросы: белки {} г, углеводы {} г, жиры {} г",
        proposal.plan.protein_g, proposal.plan.carbs_g, proposal.plan.fat_g
    )
}

/// Preview shown before confirmation.
pub(crate) fn render_preview(proposal: &PendingPlan) -> String {
    let plan = &proposal.plan;
    let safety = if plan.adjusted {
        format!(
            "\n⚠️ Калораж увеличен до {} ккал (минимум {}).",
            plan.daily_calories, plan.min_calories
        )
    } else {
        String::new()
    };

    format!(
        "🎯 Цель: {:.1} кг (текущий {:.1} кг)\n🍽️ Калораж: ~{} ккал/день (TDEE ~{} ккал)\n{}\n⏰ Срок: ~{} нед.{}\n\nПодходит? Напиши: «да» — применить, «нет» — отмена",
        proposal.target_weight,
        proposal.current_weight,
        plan.daily_calories,
        plan.tdee.round() as i64,
        render_macros(proposal),
        plan.weeks,
        safety
    )
}

/// Reply after a plan was applied.
pub(crate) fn render_applied(proposal: &PendingPlan) -> String {
    format!(
        "✅ План применён!\n\n🎯 Цель: {:.1} кг\n🍽️ Калораж: ~{} ккал/день\n{}\n⏰ Срок: ~{} нед.",
        proposal.target_weight,
        proposal.plan.daily_calories,
        render_macros(proposal),
        proposal.plan.weeks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use database::ProfileUpdate;
    use mock_brain::{FailingBrain, ScriptedBrain};

    struct Fixture {
        database: Database,
        estimator: CalorieEstimator,
        workouts: WorkoutGenerator,
        pending: PendingStore,
        now: NaiveDateTime,
    }

    impl Fixture {
        async fn new(brain: Arc<dyn brain_core::Brain>) -> Self {
            let database = Database::in_memory().await.unwrap();
            let now = NaiveDate::from_ymd_opt(2026, 3, 10)
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .unwrap();
            user::ensure_user(database.pool(), "u1", now).await.unwrap();

            Self {
                database,
                estimator: CalorieEstimator::new(brain.clone()),
                workouts: WorkoutGenerator::new(brain),
                pending: PendingStore::default(),
                now,
            }
        }

        fn actions(&self) -> Actions<'_> {
            Actions {
                database: &self.database,
                estimator: &self.estimator,
                workouts: &self.workouts,
                pending: &self.pending,
                now: self.now,
            }
        }
    }

    #[tokio::test]
    async fn test_log_meal_updates_today() {
        let fixture = Fixture::new(Arc::new(ScriptedBrain::new().with_reply("300"))).await;
        let reply = fixture.actions().log_meal("u1", "  Борщ 300 мл ").await.unwrap();

        assert!(reply.contains("Сохранено: борщ 300 мл"));
        assert!(reply.contains("~300 ккал"));
        assert!(reply.contains("~300/2000"));
        assert!(reply.contains("Остаток: ~1700"));
    }

    #[tokio::test]
    async fn test_log_meal_fallback_calories() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let reply = fixture.actions().log_meal("u1", "плов").await.unwrap();

        assert!(reply.contains("~150 ккал"));
        let today = meal::today_calories(fixture.database.pool(), "u1", fixture.now.date())
            .await
            .unwrap();
        assert_eq!(today, 150);
    }

    #[tokio::test]
    async fn test_remaining_percent() {
        let fixture = Fixture::new(Arc::new(ScriptedBrain::new().with_reply("500"))).await;
        fixture.actions().log_meal("u1", "пицца").await.unwrap();

        let reply = fixture.actions().remaining_calories("u1").await.unwrap();
        assert!(reply.contains("потреблено: ~500"));
        assert!(reply.contains("Остаток: ~1500 ккал из 2000"));
        assert!(reply.contains("Использовано: 25%"));
    }

    #[tokio::test]
    async fn test_log_weight_paths() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let actions = fixture.actions();

        assert_eq!(actions.log_weight("u1", None).await.unwrap(), WEIGHT_NOT_PARSED);
        assert!(actions.log_weight("u1", Some(5.0)).await.unwrap().contains("не похож"));
        assert_eq!(
            actions.log_weight("u1", Some(85.4)).await.unwrap(),
            "💾 Вес сохранён: 85.4 кг"
        );

        let profile = user::get_profile(fixture.database.pool(), "u1").await.unwrap();
        assert_eq!(profile.weight, Some(85.4));
        let samples = weight::list_weights(fixture.database.pool(), "u1", 10).await.unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[tokio::test]
    async fn test_status_replies_without_data() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let actions = fixture.actions();

        assert_eq!(actions.progress("u1").await.unwrap(), "Пока нет данных по прогрессу.");
        assert!(actions.show_weight("u1").await.unwrap().starts_with("Пока не знаю"));
        assert_eq!(
            actions.show_goal("u1").await.unwrap(),
            "Текущий дневной калораж: 2000 ккал/день"
        );
    }

    #[tokio::test]
    async fn test_propose_requires_weight_and_lower_goal() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let actions = fixture.actions();

        assert_eq!(actions.propose_plan("u1", "цель 75").await.unwrap(), WEIGHT_FIRST);

        actions.log_weight("u1", Some(80.0)).await.unwrap();
        assert_eq!(actions.propose_plan("u1", "цель 85").await.unwrap(), GOAL_BELOW_CURRENT);
        assert!(fixture.pending.is_empty().await);
    }

    #[tokio::test]
    async fn test_propose_confirm_writes_one_goal() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let pool = fixture.database.pool();
        user::upsert_profile(
            pool,
            "u1",
            &ProfileUpdate {
                name: None,
                age: Some(38),
                height: Some(175.0),
            },
            fixture.now,
        )
        .await
        .unwrap();
        let actions = fixture.actions();
        actions.log_weight("u1", Some(88.0)).await.unwrap();

        let preview = actions.propose_plan("u1", "цель 75").await.unwrap();
        assert!(preview.contains("Цель: 75.0 кг (текущий 88.0 кг)"));
        assert!(preview.contains("«да»"));

        let applied = actions.confirm("u1").await.unwrap();
        assert!(applied.starts_with("✅ План применён!"));
        assert_eq!(goal::count_goals(pool, "u1").await.unwrap(), 1);

        let record = goal::latest_goal(pool, "u1").await.unwrap().unwrap();
        assert_eq!(record.target_weight, 75.0);
        assert_eq!(record.goal_text, "Цель 75.0 кг");
        let profile = user::get_profile(pool, "u1").await.unwrap();
        assert_eq!(profile.goal_calories, record.calories);

        assert_eq!(actions.confirm("u1").await.unwrap(), NOTHING_TO_CONFIRM);
        assert_eq!(goal::count_goals(pool, "u1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_confirm_and_cancel_without_proposal_write_nothing() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let actions = fixture.actions();

        assert_eq!(actions.confirm("u1").await.unwrap(), NOTHING_TO_CONFIRM);
        assert_eq!(actions.cancel("u1").await, NOTHING_TO_CANCEL);
        assert_eq!(goal::count_goals(fixture.database.pool(), "u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cancel_drops_proposal() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let actions = fixture.actions();
        actions.log_weight("u1", Some(90.0)).await.unwrap();
        actions.propose_plan("u1", "на 10 кг за 12 недель").await.unwrap();

        assert_eq!(actions.cancel("u1").await, CANCELLED);
        assert_eq!(actions.confirm("u1").await.unwrap(), NOTHING_TO_CONFIRM);
    }

    #[tokio::test]
    async fn test_progress_with_goal() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let actions = fixture.actions();
        actions.log_weight("u1", Some(90.0)).await.unwrap();
        actions.propose_plan("u1", "цель 80").await.unwrap();
        actions.confirm("u1").await.unwrap();

        let reply = actions.progress("u1").await.unwrap();
        assert_eq!(reply, "Текущий вес: 90.0 кг\n🎯 Цель: 80.0 кг, осталось 10.0 кг");
    }

    #[tokio::test]
    async fn test_dispatch_workout_uses_fallback() {
        let fixture = Fixture::new(Arc::new(FailingBrain::new())).await;
        let reply = fixture
            .actions()
            .execute(
                "u1",
                ActionCall::Workout {
                    request: "30 минут".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(reply, agent_tools::static_routine());
    }

    #[test]
    fn test_preview_mentions_adjustment() {
        let plan = calculate_plan(
            &PlanInput::new(70.0, 60.0)
                .with_height(Some(160.0))
                .with_age(Some(50.0))
                .with_weeks(Some(4)),
        );
        let preview = render_preview(&PendingPlan::new(60.0, 70.0, plan));

        assert!(preview.contains("⚠️ Калораж увеличен до 1336 ккал (минимум 1300)."));
        assert!(preview.contains("Срок: ~13 нед."));
    }
}
