//! Weight history operations.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::format_timestamp;
use crate::models::WeightSample;

/// Append a weight sample and mirror it into the profile.
///
/// Both writes happen in one transaction so the profile never disagrees
/// with the latest sample.
pub async fn add_weight(
    pool: &SqlitePool,
    user_id: &str,
    weight: f64,
    at: NaiveDateTime,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query("UPDATE users SET weight = ? WHERE user_id = ?")
        .bind(weight)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Profile",
            id: user_id.to_string(),
        });
    }

    let id = sqlx::query(
        r#"
        INSERT INTO weights (user_id, weight, recorded_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(weight)
    .bind(format_timestamp(at))
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    tracing::debug!(user_id = %user_id, weight, "Recorded weight");
    Ok(id)
}

/// Most recent weight sample, if any.
pub async fn latest_weight(pool: &SqlitePool, user_id: &str) -> Result<Option<WeightSample>> {
    let sample = sqlx::query_as::<_, WeightSample>(
        r#"
        SELECT id, user_id, weight, recorded_at
        FROM weights
        WHERE user_id = ?
        ORDER BY recorded_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(sample)
}

/// Weight samples, newest first.
pub async fn list_weights(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<WeightSample>> {
    let samples = sqlx::query_as::<_, WeightSample>(
        r#"
        SELECT id, user_id, weight, recorded_at
        FROM weights
        WHERE user_id = ?
        ORDER BY recorded_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(samples)
}
