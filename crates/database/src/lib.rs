//! SQLite persistence layer for the fitness coach.
//!
//! This crate provides async database operations for profiles, weight
//! history, the meal log, confirmed goals, and reminder settings using SQLx
//! with SQLite. Functions take the pool explicitly and every operation that
//! depends on the current time takes it as an argument.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use database::{weight, user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:coach.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let now = Local::now().naive_local();
//!     user::ensure_user(db.pool(), "42", now).await?;
//!     weight::add_weight(db.pool(), "42", 88.0, now).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod goal;
pub mod meal;
pub mod models;
pub mod reminder;
pub mod user;
pub mod validation;
pub mod weight;

pub use error::{DatabaseError, Result};
pub use models::{
    GoalRecord, MealEntry, NewGoal, Profile, ProfileUpdate, ReminderSetting, Snapshot,
    WeightSample,
};
pub use validation::ValidationError;

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Storage format for timestamps: local wall-clock time, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a timestamp the way it is stored.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a calendar date the way SQLite's `date()` returns it.
pub fn format_date(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/coach.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Open a fresh in-memory database with the schema applied.
    ///
    /// A single connection keeps every query on the same memory database.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(at(17, 9)), "2026-10-17T09:00:00");
        assert_eq!(format_date(at(17, 9).date()), "2026-10-17");
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let db = Database::in_memory().await.unwrap();
        let now = at(17, 9);

        // First contact creates the profile and its reminder row.
        assert!(user::ensure_user(db.pool(), "u1", now).await.unwrap());
        assert!(!user::ensure_user(db.pool(), "u1", now).await.unwrap());

        let profile = user::get_profile(db.pool(), "u1").await.unwrap();
        assert_eq!(profile.goal_calories, 2000);
        assert!(profile.weight.is_none());

        let setting = reminder::get_setting(db.pool(), "u1").await.unwrap();
        assert!(setting.remind_weekly);
        assert!(setting.last_weighin_reminder_at.is_none());

        // Weight, meal, goal.
        weight::add_weight(db.pool(), "u1", 88.0, now).await.unwrap();
        meal::add_meal(db.pool(), "u1", "омлет", 320, now).await.unwrap();
        let goal = NewGoal {
            goal_text: "Цель 75.0 кг".to_string(),
            target_weight: 75.0,
            calories: 1889,
            proteins: 150,
            carbs: 192,
            fats: 53,
            weeks: 18,
        };
        goal::apply_goal(db.pool(), "u1", &goal, now).await.unwrap();

        let snapshot = user::get_snapshot(db.pool(), "u1", now.date()).await.unwrap();
        assert_eq!(snapshot.profile.weight, Some(88.0));
        assert_eq!(snapshot.profile.goal_calories, 1889);
        assert_eq!(snapshot.calories_today, 320);

        // Reset cascades everywhere.
        assert!(user::delete_user(db.pool(), "u1").await.unwrap());
        assert!(matches!(
            user::get_profile(db.pool(), "u1").await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(weight::latest_weight(db.pool(), "u1").await.unwrap().is_none());
        assert_eq!(meal::today_calories(db.pool(), "u1", now.date()).await.unwrap(), 0);
        assert!(goal::latest_goal(db.pool(), "u1").await.unwrap().is_none());
        assert!(reminder::find_setting(db.pool(), "u1").await.unwrap().is_none());
        assert!(!user::delete_user(db.pool(), "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_reminder_due_with_simulated_clock() {
        let db = Database::in_memory().await.unwrap();
        let start = at(1, 10);

        user::ensure_user(db.pool(), "u1", start).await.unwrap();

        // No weight sample, never reminded.
        assert_eq!(reminder::list_due(db.pool(), start).await.unwrap(), vec!["u1"]);

        reminder::mark_reminded(db.pool(), "u1", start).await.unwrap();
        assert!(reminder::list_due(db.pool(), start).await.unwrap().is_empty());

        let almost = start + Duration::days(6) + Duration::hours(11);
        assert!(reminder::list_due(db.pool(), almost).await.unwrap().is_empty());

        let later = start + Duration::days(6) + Duration::hours(12);
        assert_eq!(reminder::list_due(db.pool(), later).await.unwrap(), vec!["u1"]);
    }
}
