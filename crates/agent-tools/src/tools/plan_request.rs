//! Goal weight and timeframe hints from a free-text plan request.
//!
//! Understands "цель 75", "на 7 кг", "за 12 недель", "за 3 месяца",
//! "за два месяца" and "0.5 кг в неделю". When several goal forms appear,
//! an explicit "цель N" wins over a relative "на N кг", which wins over a
//! bare "N кг".

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::numbers::parse_decimal;

/// Relative goals never go below this weight, kg.
const MIN_GOAL_WEIGHT: f64 = 40.0;

const WEEKS_PER_MONTH: u32 = 4;

static SPEED: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*кг[^а-я0-9]{0,5}в[^а-я0-9]{0,5}нед").ok()
});

static WEEKS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bза\s*(\d+)\s*нед").ok());

static MONTHS_NUM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bза\s*(\d+)\s*месяц").ok());

static MONTHS_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bза\s*([а-я]+)\s+месяц").ok());

static ONE_MONTH: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bза\s*месяц").ok());

static ABSOLUTE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"цель\s*(?:[:\-]\s*)?(?:до\s*)?(\d+(?:[.,]\d+)?)").ok()
});

static RELATIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bна\s*(\d+(?:[.,]\d+)?)\s*кг").ok());

static BARE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*кг").ok());

static HAS_NA: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\bна\s").ok());

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Target weight, kg.
    pub goal_weight: Option<f64>,
    /// Requested duration, weeks.
    pub weeks_hint: Option<u32>,
    /// Requested loss per week, kg.
    pub speed_hint: Option<f64>,
}

fn capture_decimal(regex: &LazyLock<Option<Regex>>, text: &str) -> Option<f64> {
    let caps = regex.as_ref()?.captures(text)?;
    parse_decimal(caps.get(1)?.as_str())
}

fn capture_integer(regex: &LazyLock<Option<Regex>>, text: &str) -> Option<u32> {
    let caps = regex.as_ref()?.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

fn month_word(word: &str) -> Option<u32> {
    let n = match word {
        "один" | "одна" | "одно" => 1,
        "два" | "две" => 2,
        "три" => 3,
        "четыре" => 4,
        "пять" => 5,
        "шесть" => 6,
        "семь" => 7,
        "восемь" => 8,
        "девять" => 9,
        "десять" => 10,
        "одиннадцать" => 11,
        "двенадцать" => 12,
        _ => return None,
    };
    Some(n)
}

fn weeks_hint(text: &str) -> Option<u32> {
    if let Some(weeks) = capture_integer(&WEEKS, text) {
        return Some(weeks);
    }

    let from_word = MONTHS_WORD
        .as_ref()
        .and_then(|r| r.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| month_word(m.as_str()));

    let months = from_word
        .or_else(|| capture_integer(&MONTHS_NUM, text))
        .or_else(|| {
            ONE_MONTH
                .as_ref()
                .filter(|r| r.is_match(text))
                .map(|_| 1)
        })?;

    Some(months.saturating_mul(WEEKS_PER_MONTH))
}

/// Start offset of the speed phrase, so its number is not taken as a goal.
fn speed_match(text: &str) -> Option<(usize, f64)> {
    let caps = SPEED.as_ref()?.captures(text)?;
    let m = caps.get(1)?;
    Some((m.start(), parse_decimal(m.as_str())?))
}

fn bare_goal(text: &str, speed_start: Option<usize>) -> Option<f64> {
    if HAS_NA.as_ref().is_some_and(|r| r.is_match(text)) {
        return None;
    }

    BARE.as_ref()?
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find(|m| Some(m.start()) != speed_start)
        .and_then(|m| parse_decimal(m.as_str()))
}

/// Parse a plan request relative to the user's current weight.
pub fn parse_plan_request(text: &str, current_weight: f64) -> PlanRequest {
    let text = text.to_lowercase();

    let speed = speed_match(&text);
    let speed_start = speed.map(|(start, _)| start);

    let goal_weight = capture_decimal(&ABSOLUTE, &text)
        .or_else(|| {
            capture_decimal(&RELATIVE, &text).map(|kg| (current_weight - kg).max(MIN_GOAL_WEIGHT))
        })
        .or_else(|| bare_goal(&text, speed_start));

    PlanRequest {
        goal_weight,
        weeks_hint: weeks_hint(&text),
        speed_hint: speed.map(|(_, kg)| kg),
    }
}
