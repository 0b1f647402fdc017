//! Weight-loss plan calculator.
//!
//! Mifflin-St Jeor maintenance estimate, a capped daily deficit and a
//! minimum daily intake. The calculation runs in three passes:
//! [`compute_naive`] picks a duration and deficit, [`check_floor`] tests the
//! result against the minimum intake, and [`recompute_safe`] stretches the
//! duration when the floor was crossed.

use serde::{Deserialize, Serialize};

/// Energy in one kilogram of body fat, kcal.
const KCAL_PER_KG: f64 = 7700.0;

/// Largest daily deficit the plan will ever ask for, kcal.
const MAX_DAILY_DEFICIT: f64 = 1000.0;

/// Weekly loss assumed when the user gave no timeframe, kg.
const DEFAULT_WEEKLY_LOSS: f64 = 0.75;

/// Weekly loss used when the maintenance estimate is already below the floor.
const FALLBACK_SAFE_PACE: f64 = 0.3;

/// Every plan lasts at least this many weeks.
const MIN_WEEKS: u32 = 4;

const DEFAULT_HEIGHT_CM: f64 = 175.0;
const DEFAULT_AGE: f64 = 35.0;
const DEFAULT_ACTIVITY_FACTOR: f64 = 1.5;

/// Inputs for [`calculate_plan`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    /// Current weight, kg.
    pub current_weight: f64,
    /// Target weight, kg.
    pub goal_weight: f64,
    /// Requested duration in weeks.
    pub weeks_hint: Option<u32>,
    /// Requested loss per week, kg. Ignored when `weeks_hint` is set.
    pub speed_hint: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<f64>,
    pub activity_factor: f64,
}

impl PlanInput {
    /// Input with default height, age and activity.
    pub fn new(current_weight: f64, goal_weight: f64) -> Self {
        Self {
            current_weight,
            goal_weight,
            weeks_hint: None,
            speed_hint: None,
            height_cm: None,
            age: None,
            activity_factor: DEFAULT_ACTIVITY_FACTOR,
        }
    }

    pub fn with_weeks(mut self, weeks: Option<u32>) -> Self {
        self.weeks_hint = weeks;
        self
    }

    pub fn with_speed(mut self, kg_per_week: Option<f64>) -> Self {
        self.speed_hint = kg_per_week;
        self
    }

    pub fn with_height(mut self, height_cm: Option<f64>) -> Self {
        self.height_cm = height_cm;
        self
    }

    pub fn with_age(mut self, age: Option<f64>) -> Self {
        self.age = age;
        self
    }

    pub fn with_activity(mut self, factor: f64) -> Self {
        self.activity_factor = factor;
        self
    }
}

/// A computed plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Daily calorie target, kcal.
    pub daily_calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
    /// Duration in weeks, never below 4.
    pub weeks: u32,
    /// Weight to lose, kg. Non-positive when the goal is not below current.
    pub delta_kg: f64,
    /// Maintenance estimate, kcal.
    pub tdee: f64,
    /// Daily deficit actually applied, kcal.
    pub deficit: f64,
    /// True when the minimum intake forced a longer plan.
    pub adjusted: bool,
    /// Minimum daily intake that applied to this plan.
    pub min_calories: i64,
}

/// Intermediate result of the first pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaivePlan {
    pub delta_kg: f64,
    pub weeks: u32,
    pub tdee: f64,
    pub deficit: f64,
    pub daily_calories: i64,
}

/// Minimum daily intake for a given current weight.
pub fn safety_floor(current_weight: f64) -> i64 {
    if current_weight >= 75.0 {
        1500
    } else {
        1300
    }
}

fn weeks_for(delta_kg: f64, kg_per_week: f64) -> u32 {
    let weeks = (delta_kg / kg_per_week).ceil();
    if weeks.is_finite() && weeks > MIN_WEEKS as f64 {
        weeks.min(u32::MAX as f64) as u32
    } else {
        MIN_WEEKS
    }
}

fn daily_deficit(delta_kg: f64, weeks: u32) -> f64 {
    let deficit = delta_kg * KCAL_PER_KG / (weeks as f64 * 7.0);
    deficit.clamp(0.0, MAX_DAILY_DEFICIT)
}

/// Maintenance calories for the input, Mifflin-St Jeor times activity.
pub fn maintenance_calories(input: &PlanInput) -> f64 {
    let height = input.height_cm.unwrap_or(DEFAULT_HEIGHT_CM);
    let age = input.age.unwrap_or(DEFAULT_AGE);
    let bmr = 10.0 * input.current_weight + 6.25 * height - 5.0 * age + 5.0;
    bmr * input.activity_factor
}

/// First pass: duration from the hints, capped deficit, raw target.
pub fn compute_naive(input: &PlanInput) -> NaivePlan {
    let delta_kg = input.current_weight - input.goal_weight;

    let weeks = if delta_kg <= 0.0 {
        MIN_WEEKS
    } else if let Some(hint) = input.weeks_hint {
        hint.max(MIN_WEEKS)
    } else if let Some(speed) = input.speed_hint.filter(|s| *s > 0.0) {
        weeks_for(delta_kg, speed)
    } else {
        weeks_for(delta_kg, DEFAULT_WEEKLY_LOSS)
    };

    let tdee = maintenance_calories(input);
    let deficit = daily_deficit(delta_kg, weeks);

    NaivePlan {
        delta_kg,
        weeks,
        tdee,
        deficit,
        daily_calories: (tdee - deficit).round() as i64,
    }
}

/// Second pass: whether the naive target crossed the floor on a loss plan.
pub fn check_floor(naive: &NaivePlan, floor: i64) -> bool {
    naive.delta_kg > 0.0 && naive.daily_calories < floor
}

/// Third pass: longest-safe duration so the target stays at or above the floor.
pub fn recompute_safe(naive: &NaivePlan, floor: i64) -> NaivePlan {
    let max_deficit = naive.tdee - floor as f64;
    let mut pace = max_deficit * 7.0 / KCAL_PER_KG;
    if pace <= 0.0 {
        pace = FALLBACK_SAFE_PACE;
    }

    let weeks = weeks_for(naive.delta_kg, pace);
    let deficit = daily_deficit(naive.delta_kg, weeks);
    let target = ((naive.tdee - deficit).round() as i64).max(floor);

    NaivePlan {
        weeks,
        deficit,
        daily_calories: target,
        ..*naive
    }
}

/// Compute a plan. Pure: the same input always yields the same plan.
pub fn calculate_plan(input: &PlanInput) -> Plan {
    let floor = safety_floor(input.current_weight);
    let naive = compute_naive(input);

    let (settled, adjusted) = if check_floor(&naive, floor) {
        (recompute_safe(&naive, floor), true)
    } else {
        (naive, false)
    };

    let protein_g = (2.0 * input.goal_weight).round() as i64;
    let fat_g = (0.7 * input.goal_weight).round() as i64;
    let carbs_g = ((settled.daily_calories - 4 * protein_g - 9 * fat_g) / 4).max(0);

    Plan {
        daily_calories: settled.daily_calories,
        protein_g,
        carbs_g,
        fat_g,
        weeks: settled.weeks,
        delta_kg: settled.delta_kg,
        tdee: settled.tdee,
        deficit: settled.deficit,
        adjusted,
        min_calories: floor,
    }
}
