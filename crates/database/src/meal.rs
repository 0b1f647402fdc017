//! Meal log operations.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::MealEntry;
use crate::{format_date, format_timestamp};

/// Append a meal entry. Returns the new row id.
pub async fn add_meal(
    pool: &SqlitePool,
    user_id: &str,
    description: &str,
    calories: i64,
    at: NaiveDateTime,
) -> Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO meals (user_id, description, calories, eaten_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(description)
    .bind(calories)
    .bind(format_timestamp(at))
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Sum of calories logged on the given local calendar day.
pub async fn today_calories(pool: &SqlitePool, user_id: &str, today: NaiveDate) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(calories), 0)
        FROM meals
        WHERE user_id = ? AND date(eaten_at) = ?
        "#,
    )
    .bind(user_id)
    .bind(format_date(today))
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Meals logged on the given day, oldest first.
pub async fn list_meals_on(pool: &SqlitePool, user_id: &str, day: NaiveDate) -> Result<Vec<MealEntry>> {
    let meals = sqlx::query_as::<_, MealEntry>(
        r#"
        SELECT id, user_id, description, calories, eaten_at
        FROM meals
        WHERE user_id = ? AND date(eaten_at) = ?
        ORDER BY eaten_at, id
        "#,
    )
    .bind(user_id)
    .bind(format_date(day))
    .fetch_all(pool)
    .await?;

    Ok(meals)
}
