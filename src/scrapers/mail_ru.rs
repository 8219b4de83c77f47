//! Mail.ru Horo daily forecast scraper.
//!
//! The forecast body has moved between several containers over time, so
//! three layouts are tried, newest first:
//!
//! 1. `div.article__item` (current article renderer)
//! 2. any `<article>` element
//! 3. `div[data-qa="Article"]` (older React layout)
//!
//! In every layout the forecast is split into several paragraphs, which are
//! joined into one fragment.

use super::{Source, Strategy, joined_paragraphs};
use crate::zodiac::ZodiacSign;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ARTICLE_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.article__item").expect("valid selector"));
static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));
static DATA_QA_ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-qa="Article"]"#).expect("valid selector"));

const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "div.article__item p",
        extract: article_item,
    },
    Strategy {
        name: "article p",
        extract: article,
    },
    Strategy {
        name: "div[data-qa=Article] p",
        extract: data_qa_article,
    },
];

pub fn source() -> Source {
    Source {
        name: "Mail.ru",
        url,
        strategies: STRATEGIES,
        skip_short_matches: false,
    }
}

pub fn url(sign: ZodiacSign) -> String {
    format!("https://horo.mail.ru/prediction/{}/today/", sign.token())
}

fn article_item(document: &Html) -> Option<String> {
    joined_paragraphs(document, &ARTICLE_ITEM)
}

fn article(document: &Html) -> Option<String> {
    joined_paragraphs(document, &ARTICLE)
}

fn data_qa_article(document: &Html) -> Option<String> {
    joined_paragraphs(document, &DATA_QA_ARTICLE)
}
