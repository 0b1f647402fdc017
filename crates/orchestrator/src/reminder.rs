//! Weekly weigh-in reminders.

use std::env;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use database::{reminder, Database};
use tracing::{debug, error, info, warn};

use crate::error::OrchestratorError;
use crate::sender::MessageSender;

/// Text sent to every due user.
pub const REMINDER_TEXT: &str =
    "🔔 Еженедельное напоминание: взвесься сегодня и пришли сообщение: «взвесился 85.4»";

/// Scheduling knobs for the reminder loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSettings {
    /// Whether the loop runs at all.
    pub enabled: bool,
    /// Time between scans.
    pub interval: Duration,
    /// Delay before the first scan.
    pub initial_delay: Duration,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(3600),
            initial_delay: Duration::from_secs(5),
        }
    }
}

impl ReminderSettings {
    /// Load settings from `COACH_REMINDERS_ENABLED`,
    /// `COACH_REMINDER_INTERVAL_SECS` and `COACH_REMINDER_INITIAL_DELAY_SECS`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(enabled) = env::var("COACH_REMINDERS_ENABLED")
            .ok()
            .and_then(|v| parse_bool(&v))
        {
            settings.enabled = enabled;
        }
        if let Some(secs) = env::var("COACH_REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            settings.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env::var("COACH_REMINDER_INITIAL_DELAY_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            settings.initial_delay = Duration::from_secs(secs);
        }

        settings
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Periodic scan that nudges users who have not weighed in for a week.
pub struct WeeklyReminder<S: MessageSender> {
    database: Database,
    sender: S,
    settings: ReminderSettings,
}

impl<S: MessageSender> WeeklyReminder<S> {
    pub fn new(database: Database, sender: S, settings: ReminderSettings) -> Self {
        Self {
            database,
            sender,
            settings,
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Send reminders to every user due at `now`.
    ///
    /// A failed send is logged and skipped; that user stays due for the
    /// next scan.
    pub async fn run_once(&self, now: NaiveDateTime) -> Result<ReminderReport, OrchestratorError> {
        let due = reminder::list_due(self.database.pool(), now).await?;
        let mut report = ReminderReport {
            due: due.len(),
            ..ReminderReport::default()
        };

        for user_id in &due {
            match self.sender.send_message(user_id, REMINDER_TEXT).await {
                Ok(()) => {
                    reminder::mark_reminded(self.database.pool(), user_id, now).await?;
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "REMINDER_SEND_FAILED");
                    report.failed += 1;
                }
            }
        }

        if report.due > 0 {
            info!(
                due = report.due,
                sent = report.sent,
                failed = report.failed,
                "Reminder scan complete"
            );
        } else {
            debug!("No reminders due");
        }

        Ok(report)
    }

    /// Scan forever on the configured schedule.
    ///
    /// Returns immediately when reminders are disabled. Scan errors are
    /// logged and the loop continues.
    pub async fn run(&self) {
        if !self.settings.enabled {
            info!("Weekly reminders disabled");
            return;
        }

        tokio::time::sleep(self.settings.initial_delay).await;
        let mut ticker = tokio::time::interval(self.settings.interval);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once(Local::now().naive_local()).await {
                error!(error = %e, "Reminder scan failed");
            }
        }
    }
}
