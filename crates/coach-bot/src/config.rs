//! Configuration for the coach binary.

use std::env;

use brain_core::BrainError;
use orchestrator::{MemorySettings, ReminderSettings};

/// Default database location.
pub const DEFAULT_SQLITE_PATH: &str = "./data/coach.db";

/// Everything the binary needs besides the model settings.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// SQLite URL for the coach database.
    pub sqlite_url: String,
    /// Memory, pending-plan and agent limits.
    pub memory: MemorySettings,
    /// Weekly reminder schedule.
    pub reminders: ReminderSettings,
}

impl CoachConfig {
    /// Create a config from a SQLite path or URL with default limits.
    pub fn from_sqlite_path(path: impl Into<String>) -> Self {
        let sqlite_path = path.into();
        Self {
            sqlite_url: sqlite_url_from_path(&sqlite_path),
            memory: MemorySettings::default(),
            reminders: ReminderSettings::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SQLITE_PATH` (path or sqlite URL, default: ./data/coach.db)
    /// - `COACH_MEMORY_MAX_TURNS`, `COACH_MEMORY_MAX_USERS`,
    ///   `COACH_PENDING_TTL_SECS`, `COACH_AGENT_MAX_ITERATIONS`
    /// - `COACH_REMINDERS_ENABLED`, `COACH_REMINDER_INTERVAL_SECS`,
    ///   `COACH_REMINDER_INITIAL_DELAY_SECS`
    pub fn from_env() -> Result<Self, BrainError> {
        let sqlite_path =
            env::var("SQLITE_PATH").unwrap_or_else(|_| DEFAULT_SQLITE_PATH.to_string());

        Ok(Self {
            sqlite_url: sqlite_url_from_path(&sqlite_path),
            memory: MemorySettings::from_env(),
            reminders: ReminderSettings::from_env(),
        })
    }
}

fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}
