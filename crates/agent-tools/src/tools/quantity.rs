//! Quantity extraction from meal descriptions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::numbers::parse_decimal;

static GRAMS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?:граммов|грамма|грамм|грам|гр|г|grams|gram|gr|g)\b").ok()
});

static MILLILITERS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?:мл|миллилитр[а-я]*|ml)\b").ok()
});

static PIECES: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(?:шт|штук[аи]?|кус(?:ок|ка|ков)|яйц[оа]?|яиц|pcs)\b").ok()
});

static EGG_WORDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(одно|один|одна|два|две|три|четыре|пять|шесть|семь|восемь|девять|десять)\b.*(?:яйц|яиц)")
        .ok()
});

/// Quantities found in a meal description. Unset means "not stated".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantities {
    pub grams: Option<f64>,
    pub milliliters: Option<f64>,
    pub pieces: Option<f64>,
}

impl Quantities {
    /// True when nothing was recognized.
    pub fn is_empty(&self) -> bool {
        self.grams.is_none() && self.milliliters.is_none() && self.pieces.is_none()
    }

    /// One-line summary for a model prompt.
    pub fn describe(&self) -> String {
        fn field(value: Option<f64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_else(|| "не указано".to_string())
        }

        format!(
            "граммы={}, мл={}, штуки={}",
            field(self.grams),
            field(self.milliliters),
            field(self.pieces)
        )
    }
}

fn number_word(word: &str) -> Option<f64> {
    let value = match word {
        "одно" | "один" | "одна" => 1.0,
        "два" | "две" => 2.0,
        "три" => 3.0,
        "четыре" => 4.0,
        "пять" => 5.0,
        "шесть" => 6.0,
        "семь" => 7.0,
        "восемь" => 8.0,
        "девять" => 9.0,
        "десять" => 10.0,
        _ => return None,
    };
    Some(value)
}

fn capture_number(regex: &LazyLock<Option<Regex>>, text: &str) -> Option<f64> {
    let captures = regex.as_ref()?.captures(text)?;
    parse_decimal(captures.get(1)?.as_str())
}

/// Extract grams, milliliters and pieces from free text.
///
/// Each unit is matched independently; nothing is inferred. A number word
/// before an egg noun ("две яйца") sets the piece count and takes priority
/// over a numeric piece count.
pub fn extract_quantities(text: &str) -> Quantities {
    let text = text.to_lowercase();

    let mut quantities = Quantities {
        grams: capture_number(&GRAMS, &text),
        milliliters: capture_number(&MILLILITERS, &text),
        pieces: capture_number(&PIECES, &text),
    };

    let word_pieces = EGG_WORDS
        .as_ref()
        .and_then(|regex| regex.captures(&text))
        .and_then(|captures| captures.get(1))
        .and_then(|word| number_word(word.as_str()));

    if word_pieces.is_some() {
        quantities.pieces = word_pieces;
    }

    quantities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_aliases() {
        for text in ["150 г курицы", "150г курицы", "150 гр курицы", "150 грамм курицы", "150 g chicken"] {
            let q = extract_quantities(text);
            assert_eq!(q.grams, Some(150.0), "{}", text);
            assert_eq!(q.milliliters, None, "{}", text);
            assert_eq!(q.pieces, None, "{}", text);
        }
    }

    #[test]
    fn test_grams_decimal_comma() {
        assert_eq!(extract_quantities("12,5 г масла").grams, Some(12.5));
    }

    #[test]
    fn test_gram_letter_inside_word_is_not_a_unit() {
        assert_eq!(extract_quantities("3 горсти орехов").grams, None);
    }

    #[test]
    fn test_milliliters() {
        let q = extract_quantities("Выпил 250 мл кефира");
        assert_eq!(q.milliliters, Some(250.0));
        assert_eq!(q.grams, None);
        assert_eq!(extract_quantities("330 миллилитров колы").milliliters, Some(330.0));
    }

    #[test]
    fn test_pieces_numeric() {
        assert_eq!(extract_quantities("я съел 2 яйца").pieces, Some(2.0));
        assert_eq!(extract_quantities("3 шт печенья").pieces, Some(3.0));
        assert_eq!(extract_quantities("1 кусок пиццы").pieces, Some(1.0));
        assert_eq!(extract_quantities("5 яиц").pieces, Some(5.0));
    }

    #[test]
    fn test_number_words_before_eggs() {
        assert_eq!(extract_quantities("съел два яйца").pieces, Some(2.0));
        assert_eq!(extract_quantities("Три вареных яйца").pieces, Some(3.0));
        assert_eq!(extract_quantities("десять яиц").pieces, Some(10.0));
    }

    #[test]
    fn test_number_word_without_egg_is_ignored() {
        assert_eq!(extract_quantities("два банана").pieces, None);
    }

    #[test]
    fn test_multiple_units_are_independent() {
        let q = extract_quantities("200 г творога, 100 мл молока и 2 шт хлеба");
        assert_eq!(q.grams, Some(200.0));
        assert_eq!(q.milliliters, Some(100.0));
        assert_eq!(q.pieces, Some(2.0));
    }

    #[test]
    fn test_nothing_found() {
        let q = extract_quantities("салат цезарь");
        assert!(q.is_empty());
        assert_eq!(q.describe(), "граммы=не указано, мл=не указано, штуки=не указано");
    }
}
