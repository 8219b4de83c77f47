//! Rambler Horoscopes scraper.
//!
//! Rambler renders the forecast as the first paragraph of the article body;
//! later paragraphs are promo blocks, so only the first one is taken. Some
//! pages lead with a short date line instead, so a short first paragraph
//! moves on to the next layout.

use super::{Source, Strategy, first_paragraph};
use crate::zodiac::ZodiacSign;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static MT_ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-mt-part="article"]"#).expect("valid selector"));
static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));

const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "div[data-mt-part=article] p",
        extract: mt_article,
    },
    Strategy {
        name: "article p",
        extract: article,
    },
];

pub fn source() -> Source {
    Source {
        name: "Rambler",
        url,
        strategies: STRATEGIES,
        skip_short_matches: true,
    }
}

pub fn url(sign: ZodiacSign) -> String {
    format!("https://horoscopes.rambler.ru/{}/", sign.token())
}

fn mt_article(document: &Html) -> Option<String> {
    first_paragraph(document, &MT_ARTICLE)
}

fn article(document: &Html) -> Option<String> {
    first_paragraph(document, &ARTICLE)
}
