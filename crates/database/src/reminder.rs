//! Weekly weigh-in reminder settings.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::format_timestamp;
use crate::models::ReminderSetting;

/// A user is due when their latest weight is at least this old (7 days).
pub const WEIGHT_STALE_SECS: i64 = 7 * 24 * 60 * 60;

/// Minimum spacing between two reminders (6.5 days).
pub const REMINDER_SPACING_SECS: i64 = 13 * 12 * 60 * 60;

/// Get the reminder settings for a user, if they exist.
pub async fn find_setting(pool: &SqlitePool, user_id: &str) -> Result<Option<ReminderSetting>> {
    let setting = sqlx::query_as::<_, ReminderSetting>(
        r#"
        SELECT user_id, remind_weekly, last_weighin_reminder_at
        FROM settings
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(setting)
}

/// Get the reminder settings for a user.
pub async fn get_setting(pool: &SqlitePool, user_id: &str) -> Result<ReminderSetting> {
    find_setting(pool, user_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "ReminderSetting",
            id: user_id.to_string(),
        })
}

/// Turn the weekly reminder on or off.
pub async fn set_remind_weekly(pool: &SqlitePool, user_id: &str, enabled: bool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (user_id, remind_weekly)
        VALUES (?, ?)
        ON CONFLICT(user_id) DO UPDATE SET remind_weekly = excluded.remind_weekly
        "#,
    )
    .bind(user_id)
    .bind(enabled)
    .execute(pool)
    .await?;

    tracing::debug!(user_id = %user_id, enabled, "Updated weekly reminder");
    Ok(())
}

/// Record that a reminder was sent at `at`.
pub async fn mark_reminded(pool: &SqlitePool, user_id: &str, at: NaiveDateTime) -> Result<()> {
    sqlx::query("UPDATE settings SET last_weighin_reminder_at = ? WHERE user_id = ?")
        .bind(format_timestamp(at))
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Users due a weigh-in reminder at `now`.
///
/// Due means: reminder enabled, and no weight ever or the latest weight is
/// at least 7 days old, and never reminded or reminded at least 6.5 days ago.
pub async fn list_due(pool: &SqlitePool, now: NaiveDateTime) -> Result<Vec<String>> {
    let now = format_timestamp(now);

    let users = sqlx::query_scalar::<_, String>(
        r#"
        SELECT s.user_id
        FROM settings s
        JOIN users u ON u.user_id = s.user_id
        LEFT JOIN (
            SELECT user_id, MAX(recorded_at) AS last_weight_at
            FROM weights
            GROUP BY user_id
        ) w ON w.user_id = s.user_id
        WHERE s.remind_weekly = 1
          AND (w.last_weight_at IS NULL
               OR CAST(strftime('%s', ?) AS INTEGER)
                  - CAST(strftime('%s', w.last_weight_at) AS INTEGER) >= ?)
          AND (s.last_weighin_reminder_at IS NULL
               OR CAST(strftime('%s', ?) AS INTEGER)
                  - CAST(strftime('%s', s.last_weighin_reminder_at) AS INTEGER) >= ?)
        ORDER BY s.user_id
        "#,
    )
    .bind(&now)
    .bind(WEIGHT_STALE_SECS)
    .bind(&now)
    .bind(REMINDER_SPACING_SECS)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
