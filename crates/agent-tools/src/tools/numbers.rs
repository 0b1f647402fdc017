//! Decimal number scanning shared by the text parsers.

use std::sync::LazyLock;

use regex::Regex;

static DECIMAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").ok());

/// Parse a decimal that may use a comma separator ("85,4").
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

/// First decimal number in the text.
pub fn first_number(text: &str) -> Option<f64> {
    let regex = DECIMAL.as_ref()?;
    regex.find(text).and_then(|m| parse_decimal(m.as_str()))
}

/// All decimal numbers in the text, in order.
pub fn all_numbers(text: &str) -> Vec<f64> {
    match DECIMAL.as_ref() {
        Some(regex) => regex
            .find_iter(text)
            .filter_map(|m| parse_decimal(m.as_str()))
            .collect(),
        None => Vec::new(),
    }
}

/// Whether the text contains at least one digit.
pub fn has_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_accepts_comma() {
        assert_eq!(first_number("взвесился 85,4 утром"), Some(85.4));
        assert_eq!(first_number("вес 88"), Some(88.0));
        assert_eq!(first_number("без чисел"), None);
    }

    #[test]
    fn test_all_numbers() {
        assert_eq!(all_numbers("Юрий, 38, 88.5, 175"), vec![38.0, 88.5, 175.0]);
        assert!(all_numbers("ничего").is_empty());
    }

    #[test]
    fn test_has_number() {
        assert!(has_number("цель 75"));
        assert!(!has_number("цель"));
    }
}
