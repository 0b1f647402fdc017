//! Slash commands and the reset phrase.

/// Welcome text for `/start`.
pub const START_TEXT: &str = "👋 Привет! Я помогу с питанием, весом и тренировками.\n\
Напиши одной строкой: Имя, возраст, вес(кг), рост(см)\n\
Например: Юрий, 38, 88, 175\n\n\
Или команды: «цель 75», «я съел 2 яйца», «создай тренировку».\n\n\
Напоминание о взвешивании включено. Чтобы отключить: /remind_off";

/// Usage examples for `/help`.
pub const HELP_TEXT: &str = "Примеры:\n\
• Профиль: «Юрий, 38, 88, 175»\n\
• Взвесился: «взвесился 85.4»\n\
• Цель: «цель 75» или «на 7 кг за 2 месяца»\n\
• Еда: «я съел борщ 300 мл», «халва 40 г»\n\
• Тренировка: «создай тренировку на 60 минут»\n\
• Напоминания: /remind_on, /remind_off\n\
• Сброс профиля: «сброс»";

pub const REMIND_ON_TEXT: &str = "🔔 Еженедельное напоминание о взвешивании включено.";
pub const REMIND_OFF_TEXT: &str = "🔕 Еженедельное напоминание о взвешивании отключено.";
pub const RESET_TEXT: &str = "🗑️ Профиль удалён. Начни заново командой /start.";

const RESET_PHRASES: [&str; 3] = ["сброс", "/reset", "удали профиль"];

/// A recognized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    RemindOn,
    RemindOff,
    Reset,
}

impl Command {
    /// Parse a whole message as a command.
    ///
    /// Slash commands match exactly (after trimming); reset phrases match
    /// case-insensitively.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text {
            "/start" => return Some(Self::Start),
            "/help" => return Some(Self::Help),
            "/remind_on" => return Some(Self::RemindOn),
            "/remind_off" => return Some(Self::RemindOff),
            _ => {}
        }

        let lower = text.to_lowercase();
        RESET_PHRASES
            .contains(&lower.as_str())
            .then_some(Self::Reset)
    }
}
