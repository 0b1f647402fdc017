//! Goal history operations.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::format_timestamp;
use crate::models::{GoalRecord, NewGoal};

/// Append a confirmed goal and overwrite the profile's calorie goal.
///
/// Both writes commit together or not at all.
pub async fn apply_goal(
    pool: &SqlitePool,
    user_id: &str,
    goal: &NewGoal,
    at: NaiveDateTime,
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query("UPDATE users SET goal_calories = ? WHERE user_id = ?")
        .bind(goal.calories)
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
        INSERT INTO goals
            (user_id, goal_text, target_weight, calories, proteins, carbs, fats, weeks, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&goal.goal_text)
    .bind(goal.target_weight)
    .bind(goal.calories)
    .bind(goal.proteins)
    .bind(goal.carbs)
    .bind(goal.fats)
    .bind(goal.weeks)
    .bind(format_timestamp(at))
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    tx.commit().await?;

    tracing::info!(user_id = %user_id, calories = goal.calories, "Applied goal");
    Ok(id)
}

/// Most recently applied goal, if any.
pub async fn latest_goal(pool: &SqlitePool, user_id: &str) -> Result<Option<GoalRecord>> {
    let goal = sqlx::query_as::<_, GoalRecord>(
        r#"
        SELECT id, user_id, goal_text, target_weight, calories, proteins, carbs, fats, weeks, created_at
        FROM goals
        WHERE user_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(goal)
}

/// Number of goals applied by a user.
pub async fn count_goals(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM goals WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
