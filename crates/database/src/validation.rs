//! Input validation for profile fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside the plausible range.
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },
    /// Value too long.
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} {} is outside {}..={}", field, actual, min, max),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Plausible age range in years.
pub const AGE_RANGE: (f64, f64) = (10.0, 120.0);

/// Plausible body weight range in kg.
pub const WEIGHT_RANGE: (f64, f64) = (30.0, 350.0);

/// Plausible height range in cm.
pub const HEIGHT_RANGE: (f64, f64) = (100.0, 250.0);

/// Maximum stored name length, in characters.
pub const MAX_NAME_LENGTH: usize = 64;

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            actual: value,
        })
    }
}

/// Validate an age in years.
pub fn validate_age(age: i64) -> Result<(), ValidationError> {
    check_range("age", age as f64, AGE_RANGE)
}

/// Validate a body weight in kg.
pub fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    check_range("weight", weight, WEIGHT_RANGE)
}

/// Validate a height in cm.
pub fn validate_height(height: f64) -> Result<(), ValidationError> {
    check_range("height", height, HEIGHT_RANGE)
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LENGTH,
            actual: length,
        });
    }
    Ok(())
}
