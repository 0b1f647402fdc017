//! Tool implementations.

pub mod calories;
pub mod numbers;
pub mod plan;
pub mod plan_request;
pub mod quantity;
pub mod workout;
