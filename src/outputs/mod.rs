//! Text the pipeline produces from a [`FragmentSet`](crate::models::FragmentSet).
//!
//! # Submodules
//!
//! - [`template`]: the fixed-structure forecast used without an LLM, and as
//!   the fallback whenever the LLM fails
//! - [`prompt`]: the persona and user prompt sent to the LLM
//!
//! Both render dates as `DD.MM.YYYY`, the format users of the bot expect.

pub mod prompt;
pub mod template;

use chrono::NaiveDate;

/// Render a day as `DD.MM.YYYY`.
pub fn display_date(day: NaiveDate) -> String {
    day.format("%d.%m.%Y").to_string()
}
