//! Prompt construction for the AI composer.
//!
//! The prompt is bounded: each fragment is cut to a fixed number of
//! characters before it is embedded, and everything else is fixed text.

use super::display_date;
use crate::models::{ForecastContext, FragmentSet};
use crate::utils::truncate_chars;
use crate::zodiac::ZodiacSign;
use chrono::NaiveDate;
use itertools::Itertools;

/// System-role persona.
pub const PERSONA: &str = "Ты профессиональный астролог с 20-летним опытом. \
Твои прогнозы точны, практичны и вдохновляют людей.";

/// Stands in for the numerology number when the caller has none.
pub const MISSING_FATE_NUMBER: &str = "не указано";

/// Build the user-role prompt.
///
/// # Arguments
///
/// * `sign` - The sign the forecast is for
/// * `day` - The forecast day, rendered as `DD.MM.YYYY`
/// * `context` - Source of the optional "first number of fate"
/// * `fragments` - Source texts, embedded in set order as `• {source}: {text}`
/// * `fragment_chars` - Per-fragment character cap inside the prompt
pub fn build_prompt(
    sign: ZodiacSign,
    day: NaiveDate,
    context: &ForecastContext,
    fragments: &FragmentSet,
    fragment_chars: usize,
) -> String {
    let sources = fragments
        .iter()
        .map(|f| format!("• {}: {}", f.source, truncate_chars(&f.text, fragment_chars)))
        .join("\n");
    let fate_number = context
        .first_fate_number()
        .map(|n| n.to_string())
        .unwrap_or_else(|| MISSING_FATE_NUMBER.to_string());
    let date = display_date(day);
    let name = sign.display_name();

    format!(
        "Ты — профессиональный астролог. Составь ОДИН персонализированный гороскоп на {date} для знака {name}.

ДОСТУПНЫЕ ДАННЫЕ:
{sources}

ДОПОЛНИТЕЛЬНО:
• Первое число судьбы: {fate_number}

ТВОЯ ЗАДАЧА:
1. Объедини прогнозы из источников в одно связное повествование
2. Убери повторы и противоречия
3. Добавь практические советы на день
4. Используй мистический, но дружелюбный тон
5. Структурируй текст с эмодзи и заголовками

ФОРМАТ ОТВЕТА:
💫 **Общий прогноз:** [2-3 предложения]

❤️ **Личная жизнь:** [1-2 предложения]

💼 **Работа и финансы:** [1-2 предложения]

🎯 **Совет дня:** [1 предложение]

⚠️ **Предостережение:** [1 предложение]

ВАЖНО:
- Длина: 600-800 символов
- Только на русском языке
- Без вводных фраз типа \"Вот ваш гороскоп\"
- Конкретные советы, а не общие фразы"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFragment;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn set(pairs: &[(&str, String)]) -> FragmentSet {
        pairs
            .iter()
            .map(|(source, text)| SourceFragment {
                source: source.to_string(),
                text: text.clone(),
            })
            .collect()
    }

    #[test]
    fn test_prompt_embeds_fragments_in_order() {
        let fragments = set(&[("Mail.ru", "Альфа".to_string()), ("Rambler", "Бета".to_string())]);
        let prompt = build_prompt(ZodiacSign::Scorpio, day(), &ForecastContext::default(), &fragments, 400);
        assert!(prompt.contains("на 16.10.2026 для знака Скорпион"));
        assert!(prompt.contains("• Mail.ru: Альфа\n• Rambler: Бета"));
        for section in ["Общий прогноз", "Личная жизнь", "Работа и финансы", "Совет дня", "Предостережение"] {
            assert!(prompt.contains(section), "missing section {section}");
        }
        assert!(prompt.contains("600-800 символов"));
    }

    #[test]
    fn test_fragments_are_capped_in_prompt() {
        let fragments = set(&[("Mail.ru", "ю".repeat(600))]);
        let prompt = build_prompt(ZodiacSign::Leo, day(), &ForecastContext::default(), &fragments, 400);
        assert!(prompt.contains(&format!("• Mail.ru: {}\n", "ю".repeat(400))));
        assert!(!prompt.contains(&"ю".repeat(401)));
    }

    #[test]
    fn test_fate_number_placeholder() {
        let fragments = set(&[("Mail.ru", "текст".to_string())]);
        let without = build_prompt(ZodiacSign::Leo, day(), &ForecastContext::default(), &fragments, 400);
        assert!(without.contains("Первое число судьбы: не указано"));

        let with = build_prompt(ZodiacSign::Leo, day(), &ForecastContext::with_fate_number(7), &fragments, 400);
        assert!(with.contains("Первое число судьбы: 7"));
    }
}
