//! Template forecast composition.
//!
//! Two shapes exist and they never share a body line:
//!
//! ```text
//! 🔮 *Гороскоп на 16.10.2026*          🔮 *Гороскоп на 16.10.2026*
//!
//! 📰 *Источник 1: Mail.ru*             К сожалению, сейчас звезды скрыты ...
//! <fragment text>
//!                                      Попробуйте позже ...
//! 📰 *Источник 2: Rambler*
//! <fragment text>
//!
//! ✨ *Совет дня:*
//! Доверяйте своей интуиции ...
//! ```

use super::display_date;
use crate::models::FragmentSet;
use chrono::NaiveDate;
use std::fmt::{self, Write};

pub const CLOSING_HEADER: &str = "✨ *Совет дня:*";
pub const AFFIRMATION: &str = "Доверяйте своей интуиции и будьте открыты новым возможностям!";
pub const UNAVAILABLE: &str = "К сожалению, сейчас звезды скрыты за облаками. 😔";
pub const UNAVAILABLE_HINT: &str = "Попробуйте позже или проверьте подключение к интернету.";

/// Compose the template forecast for `day`.
///
/// With fragments: a header, one numbered section per fragment in set
/// order, then the closing advice. Without fragments: the "sources
/// unavailable" message.
pub fn compose(day: NaiveDate, fragments: &FragmentSet) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "🔮 *Гороскоп на {}*", display_date(day))?;
    writeln!(out)?;

    if fragments.is_empty() {
        writeln!(out, "{UNAVAILABLE}")?;
        writeln!(out)?;
        write!(out, "{UNAVAILABLE_HINT}")?;
        return Ok(out);
    }

    for (i, fragment) in fragments.iter().enumerate() {
        writeln!(out, "📰 *Источник {}: {}*", i + 1, fragment.source)?;
        writeln!(out, "{}", fragment.text)?;
        writeln!(out)?;
    }
    writeln!(out, "{CLOSING_HEADER}")?;
    write!(out, "{AFFIRMATION}")?;
    Ok(out)
}
