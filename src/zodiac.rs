//! Zodiac signs and normalization of raw sign labels.
//!
//! Labels arrive from a website form or a chat-bot keyboard, so they may be
//! plain Russian names (`"Овен"`), decorated with a zodiac glyph
//! (`"♈ Овен"`), or already canonical tokens (`"aries"`). Every label maps to
//! exactly one [`ZodiacSign`]; anything unrecognized maps to
//! [`ZodiacSign::DEFAULT`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Leading run of decorative glyphs plus trailing spaces. Combining marks
/// count as decoration, so emoji variation selectors (U+FE0F) and joiners
/// (U+200D) go with the glyph they follow.
static LEADING_GLYPHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\p{L}\p{N}_\s]+\s*").expect("valid regex"));

/// One of the twelve canonical signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// `(sign, canonical token, Russian name, glyph)`
const SIGN_TABLE: [(ZodiacSign, &str, &str, char); 12] = [
    (ZodiacSign::Aries, "aries", "Овен", '♈'),
    (ZodiacSign::Taurus, "taurus", "Телец", '♉'),
    (ZodiacSign::Gemini, "gemini", "Близнецы", '♊'),
    (ZodiacSign::Cancer, "cancer", "Рак", '♋'),
    (ZodiacSign::Leo, "leo", "Лев", '♌'),
    (ZodiacSign::Virgo, "virgo", "Дева", '♍'),
    (ZodiacSign::Libra, "libra", "Весы", '♎'),
    (ZodiacSign::Scorpio, "scorpio", "Скорпион", '♏'),
    (ZodiacSign::Sagittarius, "sagittarius", "Стрелец", '♐'),
    (ZodiacSign::Capricorn, "capricorn", "Козерог", '♑'),
    (ZodiacSign::Aquarius, "aquarius", "Водолей", '♒'),
    (ZodiacSign::Pisces, "pisces", "Рыбы", '♓'),
];

impl ZodiacSign {
    /// Substituted for any label that matches nothing in the table.
    pub const DEFAULT: ZodiacSign = ZodiacSign::Aries;

    /// All signs in table order.
    pub fn all() -> impl Iterator<Item = ZodiacSign> {
        SIGN_TABLE.iter().map(|(sign, ..)| *sign)
    }

    fn entry(self) -> &'static (ZodiacSign, &'static str, &'static str, char) {
        // The table is indexed by discriminant order.
        &SIGN_TABLE[self as usize]
    }

    /// Canonical lowercase token used in source URLs and cache keys.
    pub fn token(self) -> &'static str {
        self.entry().1
    }

    /// Russian display name, e.g. `"Скорпион"`.
    pub fn display_name(self) -> &'static str {
        self.entry().2
    }

    pub fn glyph(self) -> char {
        self.entry().3
    }

    /// The decorated label as shown on bot keyboards, e.g. `"♏ Скорпион"`.
    pub fn decorated_label(self) -> String {
        format!("{} {}", self.glyph(), self.display_name())
    }

    fn lookup(label: &str) -> Option<ZodiacSign> {
        SIGN_TABLE.iter().find_map(|(sign, token, name, glyph)| {
            let decorated = format!("{glyph} {name}");
            let hit = label == *name || label == decorated || label.eq_ignore_ascii_case(token);
            hit.then_some(*sign)
        })
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Strip leading decorative glyphs and surrounding whitespace.
pub fn clean_label(raw: &str) -> String {
    LEADING_GLYPHS.replace(raw.trim(), "").trim().to_string()
}

/// Map any raw label to a canonical sign.
///
/// The cleaned label is tried first, then the raw label as given. This
/// never fails: unknown labels resolve to [`ZodiacSign::DEFAULT`].
pub fn normalize(raw: &str) -> ZodiacSign {
    let cleaned = clean_label(raw);
    match ZodiacSign::lookup(&cleaned).or_else(|| ZodiacSign::lookup(raw)) {
        Some(sign) => sign,
        None => {
            debug!(raw, default = %ZodiacSign::DEFAULT, "Unrecognized sign label; using default");
            ZodiacSign::DEFAULT
        }
    }
}
