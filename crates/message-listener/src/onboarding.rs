//! One-line profile onboarding: "Имя, возраст, вес, рост".

use agent_tools::all_numbers;
use database::{validation, ProfileUpdate};

/// A parsed and validated profile line.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileLine {
    pub name: Option<String>,
    pub age: i64,
    pub weight: f64,
    pub height: f64,
}

impl ProfileLine {
    /// Parse a profile line.
    ///
    /// Needs at least three numbers: age, weight and height in that order.
    /// The name is whatever precedes the first digit. Returns `None` when a
    /// value is outside its plausible range, so the text can be handled as
    /// an ordinary message.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let numbers = all_numbers(text);
        let [age, weight, height, ..] = numbers.as_slice() else {
            return None;
        };
        let (age, weight, height) = (age.trunc() as i64, *weight, *height);

        validation::validate_age(age).ok()?;
        validation::validate_weight(weight).ok()?;
        validation::validate_height(height).ok()?;

        let name = text
            .find(|c: char| c.is_ascii_digit())
            .map(|index| text[..index].trim_matches(|c: char| c == ' ' || c == ','))
            .filter(|name| !name.is_empty())
            .filter(|name| validation::validate_name(name).is_ok())
            .map(str::to_string);

        Some(Self {
            name,
            age,
            weight,
            height,
        })
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name.clone(),
            age: Some(self.age),
            height: Some(self.height),
        }
    }

    /// Confirmation shown after saving.
    pub fn summary(&self) -> String {
        let who = self
            .name
            .as_deref()
            .map(|name| format!("{}, ", name))
            .unwrap_or_default();

        format!(
            "✅ Профиль сохранён: {}{} лет, {:.1} кг, {} см.\n💾 Вес сохранён: {:.1} кг\n\n\
Теперь задай цель: «цель 75» или «похудеть на 10 кг за 12 недель».",
            who,
            self.age,
            self.weight,
            self.height.trunc() as i64,
            self.weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_line() {
        let line = ProfileLine::parse("Юрий, 38, 88, 175").unwrap();
        assert_eq!(line.name.as_deref(), Some("Юрий"));
        assert_eq!(line.age, 38);
        assert_eq!(line.weight, 88.0);
        assert_eq!(line.height, 175.0);
    }

    #[test]
    fn test_without_name_and_with_decimal_comma() {
        let line = ProfileLine::parse("38 88,5 175").unwrap();
        assert_eq!(line.name, None);
        assert_eq!(line.weight, 88.5);
    }

    #[test]
    fn test_too_few_numbers() {
        assert_eq!(ProfileLine::parse("похудеть на 10 кг за 12 недель"), None);
    }

    #[test]
    fn test_implausible_values_are_rejected() {
        // A meal with three numbers is not a profile.
        assert_eq!(ProfileLine::parse("я съел 2 яйца и 200 г творога 5%"), None);
        assert_eq!(ProfileLine::parse("Аня, 30, 20, 165"), None);
        assert_eq!(ProfileLine::parse("Аня, 30, 60, 16"), None);
    }

    #[test]
    fn test_summary() {
        let line = ProfileLine::parse("Юрий, 38, 88, 175").unwrap();
        assert_eq!(
            line.summary(),
            "✅ Профиль сохранён: Юрий, 38 лет, 88.0 кг, 175 см.\n💾 Вес сохранён: 88.0 кг\n\n\
Теперь задай цель: «цель 75» или «похудеть на 10 кг за 12 недель»."
        );
    }
}
