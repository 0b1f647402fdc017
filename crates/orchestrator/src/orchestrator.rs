//! Main orchestrator that coordinates message processing.

use std::sync::Arc;

use agent_tools::{CalorieEstimator, WorkoutGenerator};
use brain_core::{Brain, ConversationHistory, GenerationRequest, InboundMessage, OutboundMessage};
use chrono::{Local, NaiveDateTime};
use database::{reminder, user, weight, Database, Profile, ProfileUpdate};
use tracing::{debug, info, warn};

use crate::actions::Actions;
use crate::agent::{load_agent_prompt, ActionExecutor, Agent};
use crate::error::OrchestratorError;
use crate::memory::MemorySettings;
use crate::pending::PendingStore;
use crate::router::{classify, Route};

/// System instruction for free conversation.
pub const SMALL_TALK_SYSTEM_PROMPT: &str = "Отвечай кратко и по делу.";

/// Reply when neither the agent nor small talk produced anything.
pub const CANNED_REPLY: &str = "Попробуй: «цель 75», «взвесился 88», «я съел 2 яйца».";

/// Main orchestrator that coordinates message processing.
///
/// The orchestrator:
/// - Makes sure every sender has a profile
/// - Classifies the message and runs confirm, cancel, plan or a keyword action
/// - Delegates everything else to the agent, then to small talk
/// - Records each exchange in the user's conversation memory
pub struct Orchestrator {
    /// Persistent store.
    database: Database,
    /// Model used for small talk.
    brain: Arc<dyn Brain>,
    estimator: CalorieEstimator,
    workouts: WorkoutGenerator,
    agent: Agent,
    /// Plans waiting for "да" / "нет".
    pending: PendingStore,
    /// Recent turns per user, fed to the agent.
    history: ConversationHistory,
}

impl Orchestrator {
    /// Create an orchestrator. The agent instruction is loaded from
    /// `COACH_AGENT_PROMPT_FILE` when set.
    pub fn new(brain: Arc<dyn Brain>, database: Database, settings: MemorySettings) -> Self {
        let template = load_agent_prompt();
        Self::with_agent_prompt(brain, database, settings, &template)
    }

    /// Create an orchestrator with an explicit agent instruction template.
    pub fn with_agent_prompt(
        brain: Arc<dyn Brain>,
        database: Database,
        settings: MemorySettings,
        template: &str,
    ) -> Self {
        info!(
            max_turns = settings.max_turns,
            max_users = settings.max_users,
            pending_ttl_secs = settings.pending_ttl.as_secs(),
            agent_max_iterations = settings.agent_max_iterations,
            "Creating orchestrator"
        );

        Self {
            estimator: CalorieEstimator::new(brain.clone()),
            workouts: WorkoutGenerator::new(brain.clone()),
            agent: Agent::with_prompt(brain.clone(), template, settings.agent_max_iterations),
            pending: PendingStore::new(settings.pending_ttl),
            history: ConversationHistory::with_limits(settings.max_turns, settings.max_users),
            brain,
            database,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn pending(&self) -> &PendingStore {
        &self.pending
    }

    fn actions(&self, now: NaiveDateTime) -> Actions<'_> {
        Actions {
            database: &self.database,
            estimator: &self.estimator,
            workouts: &self.workouts,
            pending: &self.pending,
            now,
        }
    }

    /// Process an inbound message and build the reply.
    pub async fn process_message(
        &self,
        message: &InboundMessage,
    ) -> Result<OutboundMessage, OrchestratorError> {
        let reply = self.process(&message.sender, &message.text).await?;
        Ok(OutboundMessage::reply_to(message, reply))
    }

    /// Process one user message at the current local time.
    pub async fn process(&self, user_id: &str, text: &str) -> Result<String, OrchestratorError> {
        self.process_at(user_id, text, Local::now().naive_local()).await
    }

    /// Process one user message at a given instant.
    pub async fn process_at(
        &self,
        user_id: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<String, OrchestratorError> {
        user::ensure_user(self.database.pool(), user_id, now).await?;

        let actions = self.actions(now);
        let route = classify(text);
        debug!(user_id = %user_id, route = ?route, "Classified message");

        let reply = match route {
            Route::Confirm => actions.confirm(user_id).await?,
            Route::Cancel => actions.cancel(user_id).await,
            Route::ProposePlan => actions.propose_plan(user_id, text).await?,
            Route::Rule(action) => actions.execute(user_id, action.bind(text)).await?,
            Route::Delegate => self.delegate(user_id, text, &actions).await,
        };

        self.history.add_turn(user_id, text, &reply).await;
        Ok(reply)
    }

    /// Agent first, then small talk, then a canned hint.
    async fn delegate(&self, user_id: &str, text: &str, actions: &Actions<'_>) -> String {
        let turns = self.history.turns(user_id).await;

        match self.agent.run(user_id, text, &turns, actions).await {
            Ok(answer) if !answer.trim().is_empty() => return answer,
            Ok(_) => warn!(user_id = %user_id, "AGENT_FALLBACK: empty answer"),
            Err(e) => warn!(user_id = %user_id, error = %e, "AGENT_FALLBACK"),
        }

        self.small_talk(user_id, text).await
    }

    async fn small_talk(&self, user_id: &str, text: &str) -> String {
        let request = GenerationRequest::new(SMALL_TALK_SYSTEM_PROMPT, text).with_temperature(0.3);

        match self.brain.generate(request).await {
            Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
            Ok(_) => {
                warn!(user_id = %user_id, "SMALL_TALK_FALLBACK: empty answer");
                CANNED_REPLY.to_string()
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "SMALL_TALK_FALLBACK");
                CANNED_REPLY.to_string()
            }
        }
    }

    /// Create the user's profile if needed. Returns `true` if it was created.
    pub async fn start(&self, user_id: &str, now: NaiveDateTime) -> Result<bool, OrchestratorError> {
        Ok(user::ensure_user(self.database.pool(), user_id, now).await?)
    }

    /// Save onboarding data and record the weight as a sample.
    pub async fn save_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        weight_kg: f64,
        now: NaiveDateTime,
    ) -> Result<Profile, OrchestratorError> {
        let pool = self.database.pool();
        user::ensure_user(pool, user_id, now).await?;
        user::upsert_profile(pool, user_id, update, now).await?;
        weight::add_weight(pool, user_id, weight_kg, now).await?;

        info!(user_id = %user_id, "Saved profile");
        Ok(user::get_profile(pool, user_id).await?)
    }

    /// Turn weekly weigh-in reminders on or off.
    pub async fn set_reminders(
        &self,
        user_id: &str,
        enabled: bool,
        now: NaiveDateTime,
    ) -> Result<(), OrchestratorError> {
        user::ensure_user(self.database.pool(), user_id, now).await?;
        reminder::set_remind_weekly(self.database.pool(), user_id, enabled).await?;
        Ok(())
    }

    /// Delete every record of the user and forget their pending plan and memory.
    ///
    /// Returns `true` if a profile existed.
    pub async fn reset_user(&self, user_id: &str) -> Result<bool, OrchestratorError> {
        let existed = user::delete_user(self.database.pool(), user_id).await?;
        self.pending.cancel(user_id).await;
        self.history.clear(user_id).await;

        info!(user_id = %user_id, existed, "Reset user");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mock_brain::{FailingBrain, ScriptedBrain};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 4)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    async fn orchestrator(brain: Arc<dyn Brain>) -> Orchestrator {
        let database = Database::in_memory().await.unwrap();
        Orchestrator::with_agent_prompt(
            brain,
            database,
            MemorySettings::default(),
            crate::agent::DEFAULT_AGENT_PROMPT,
        )
    }

    #[tokio::test]
    async fn test_first_message_creates_profile() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        orch.process_at("u1", "мой вес", noon()).await.unwrap();

        assert_eq!(user::count_users(orch.database().pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delegate_falls_back_to_canned_reply() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        let reply = orch.process_at("u1", "привет", noon()).await.unwrap();

        assert_eq!(reply, CANNED_REPLY);
    }

    #[tokio::test]
    async fn test_delegate_falls_back_to_small_talk() {
        let brain = ScriptedBrain::new()
            .on_system(SMALL_TALK_SYSTEM_PROMPT, "Привет! Чем помочь?")
            .with_failure("model offline");
        let orch = orchestrator(Arc::new(brain)).await;

        let reply = orch.process_at("u1", "привет", noon()).await.unwrap();
        assert_eq!(reply, "Привет! Чем помочь?");
    }

    #[tokio::test]
    async fn test_turns_are_recorded() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        orch.process_at("u1", "мой вес", noon()).await.unwrap();

        let turns = orch.history().turns("u1").await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].input, "мой вес");
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        orch.process_at("u1", "взвесился 90", noon()).await.unwrap();
        orch.process_at("u1", "цель 80", noon()).await.unwrap();
        assert!(!orch.pending().is_empty().await);

        assert!(orch.reset_user("u1").await.unwrap());
        assert!(orch.pending().get("u1").await.is_none());
        assert!(orch.history().turns("u1").await.is_empty());
        assert!(user::find_profile(orch.database().pool(), "u1").await.unwrap().is_none());
        assert!(!orch.reset_user("u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_reminders() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        orch.set_reminders("u1", false, noon()).await.unwrap();

        let setting = reminder::get_setting(orch.database().pool(), "u1").await.unwrap();
        assert!(!setting.remind_weekly);
    }

    #[tokio::test]
    async fn test_save_profile() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        let update = ProfileUpdate {
            name: Some("Аня".to_string()),
            age: Some(30),
            height: Some(165.0),
        };

        let profile = orch.save_profile("u1", &update, 70.5, noon()).await.unwrap();
        assert_eq!(profile.name.as_deref(), Some("Аня"));
        assert_eq!(profile.weight, Some(70.5));
        assert_eq!(profile.height, Some(165.0));
    }

    #[tokio::test]
    async fn test_process_message_replies_to_sender() {
        let orch = orchestrator(Arc::new(FailingBrain::new())).await;
        let message = InboundMessage::direct("u7", "мой вес", 0);

        let reply = orch.process_message(&message).await.unwrap();
        assert_eq!(reply.recipient, "u7");
        assert!(reply.text.starts_with("Пока не знаю"));
    }
}
