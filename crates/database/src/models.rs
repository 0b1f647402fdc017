//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user profile, keyed by the transport's opaque user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Opaque user id (e.g. a chat id).
    pub user_id: String,
    /// Display name, if the user gave one.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<i64>,
    /// Latest weight in kg, mirrored from the weight history.
    pub weight: Option<f64>,
    /// Height in cm.
    pub height: Option<f64>,
    /// Daily calorie goal, mirrored from the latest confirmed goal.
    pub goal_calories: i64,
    /// When the profile was created.
    pub created_at: String,
}

/// Optional profile fields supplied during onboarding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub height: Option<f64>,
}

/// Profile plus today's calorie total.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub profile: Profile,
    pub calories_today: i64,
}

/// One weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WeightSample {
    pub id: i64,
    pub user_id: String,
    pub weight: f64,
    pub recorded_at: String,
}

/// One logged meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MealEntry {
    pub id: i64,
    pub user_id: String,
    pub description: String,
    pub calories: i64,
    pub eaten_at: String,
}

/// A confirmed plan as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GoalRecord {
    pub id: i64,
    pub user_id: String,
    /// Human-readable goal, e.g. "Цель 75.0 кг".
    pub goal_text: String,
    pub target_weight: f64,
    /// Daily calorie target.
    pub calories: i64,
    pub proteins: i64,
    pub carbs: i64,
    pub fats: i64,
    pub weeks: i64,
    pub created_at: String,
}

/// A plan about to be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub goal_text: String,
    pub target_weight: f64,
    pub calories: i64,
    pub proteins: i64,
    pub carbs: i64,
    pub fats: i64,
    pub weeks: i64,
}

/// Weekly reminder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReminderSetting {
    pub user_id: String,
    pub remind_weekly: bool,
    /// When the last weigh-in reminder was sent, if ever.
    pub last_weighin_reminder_at: Option<String>,
}
