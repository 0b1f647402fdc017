//! Meal, weight and plan tools for the fitness coach.
//!
//! Everything here is either a pure function over text and numbers or a
//! thin wrapper around one [`Brain`](brain_core::Brain) call with a local
//! fallback. Persistence and routing live in the orchestrator.
//!
//! # Tools
//!
//! - [`extract_quantities`] - Grams, milliliters and piece counts in free text.
//! - [`CalorieEstimator`] - Model-backed kcal estimate clamped to a plausible range.
//! - [`calculate_plan`] - Daily calorie target and macros with a safety floor.
//! - [`parse_plan_request`] - Goal weight and timeframe hints from free text.
//! - [`WorkoutGenerator`] - Workout routine from duration, level and goal keywords.
//!
//! # Action catalog
//!
//! [`AgentAction`] is the closed set of actions the agent may choose from.
//! [`AgentAction::bind`] turns a chosen action plus its raw input into a
//! typed [`ActionCall`].
//!
//! # Example
//!
//! ```rust
//! use agent_tools::{calculate_plan, extract_quantities, PlanInput};
//!
//! let quantities = extract_quantities("200 г гречки и 2 яйца");
//! assert_eq!(quantities.grams, Some(200.0));
//! assert_eq!(quantities.pieces, Some(2.0));
//!
//! let plan = calculate_plan(&PlanInput::new(88.0, 75.0).with_age(Some(38.0)));
//! assert!(plan.weeks >= 4);
//! assert!(plan.daily_calories >= plan.min_calories);
//! ```

mod catalog;
mod error;
pub mod tools;

pub use catalog::{render_catalog, ActionCall, AgentAction};
pub use error::ToolError;
pub use tools::calories::{
    CalorieEstimate, CalorieEstimator, EstimateSource, FALLBACK_CALORIES, MAX_MEAL_CALORIES,
    MIN_MEAL_CALORIES,
};
pub use tools::numbers::{all_numbers, first_number, has_number};
pub use tools::plan::{calculate_plan, safety_floor, Plan, PlanInput};
pub use tools::plan_request::{parse_plan_request, PlanRequest};
pub use tools::quantity::{extract_quantities, Quantities};
pub use tools::workout::{
    parse_workout_request, static_routine, WorkoutGenerator, WorkoutGoal, WorkoutLevel,
    WorkoutRequest,
};
