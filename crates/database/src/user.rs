//! Profile operations.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Profile, ProfileUpdate, Snapshot};
use crate::{format_timestamp, meal};

/// Create the profile and its reminder row if absent.
///
/// Returns `true` when a new profile was created.
pub async fn ensure_user(pool: &SqlitePool, user_id: &str, now: NaiveDateTime) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (user_id, created_at)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(format_timestamp(now))
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO settings (user_id, remind_weekly)
        VALUES (?, 1)
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    if inserted > 0 {
        tracing::debug!(user_id = %user_id, "Created profile");
    }

    Ok(inserted > 0)
}

/// Create the profile if needed and overwrite the supplied fields.
///
/// Fields left as `None` keep their stored value.
pub async fn upsert_profile(
    pool: &SqlitePool,
    user_id: &str,
    update: &ProfileUpdate,
    now: NaiveDateTime,
) -> Result<Profile> {
    ensure_user(pool, user_id, now).await?;

    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            age = COALESCE(?, age),
            height = COALESCE(?, height)
        WHERE user_id = ?
        "#,
    )
    .bind(&update.name)
    .bind(update.age)
    .bind(update.height)
    .bind(user_id)
    .execute(pool)
    .await?;

    get_profile(pool, user_id).await
}

/// Get a profile, if it exists.
pub async fn find_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, name, age, weight, height, goal_calories, created_at
        FROM users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Get a profile by user id.
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Profile> {
    find_profile(pool, user_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Profile",
            id: user_id.to_string(),
        })
}

/// Profile plus the calories logged on `today`.
pub async fn get_snapshot(pool: &SqlitePool, user_id: &str, today: NaiveDate) -> Result<Snapshot> {
    let profile = get_profile(pool, user_id).await?;
    let calories_today = meal::today_calories(pool, user_id, today).await?;

    Ok(Snapshot {
        profile,
        calories_today,
    })
}

/// Delete a profile and every record that belongs to it.
///
/// Returns `false` if there was nothing to delete.
pub async fn delete_user(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    for table in ["weights", "meals", "goals", "settings"] {
        sqlx::query(&format!("DELETE FROM {} WHERE user_id = ?", table))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    let deleted = sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    tracing::info!(user_id = %user_id, deleted = deleted > 0, "Deleted profile");
    Ok(deleted > 0)
}

/// Count profiles.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
