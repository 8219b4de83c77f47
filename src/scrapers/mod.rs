//! Horoscope source extractors.
//!
//! Each source is plain data: a URL builder and an ordered list of
//! extraction [`Strategy`] functions. Strategies are tried in order against
//! the parsed page and the first one that yields non-empty text wins, so a
//! layout change on one site only breaks the strategies for that site.
//!
//! # Supported Sources
//!
//! | Source | Module | URL pattern |
//! |--------|--------|-------------|
//! | Mail.ru Horo | [`mail_ru`] | `https://horo.mail.ru/prediction/{sign}/today/` |
//! | Rambler Horoscopes | [`rambler`] | `https://horoscopes.rambler.ru/{sign}/` |
//!
//! # Adding a source
//!
//! Write a module exposing a `source()` constructor and append it to
//! [`default_sources`]. The orchestrator iterates whatever list it is given
//! and needs no change.

pub mod mail_ru;
pub mod rambler;

use crate::config::FetchSettings;
use crate::http::PageFetch;
use crate::models::SourceFragment;
use crate::utils::{collapse_whitespace, truncate_chars, truncate_for_log};
use crate::zodiac::ZodiacSign;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::{debug, info, instrument, warn};

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

/// A pure extraction rule: parsed page in, candidate text out.
pub type ExtractFn = fn(&Html) -> Option<String>;

/// One named extraction rule.
#[derive(Clone, Copy)]
pub struct Strategy {
    /// Short label for logs, usually the selector it relies on.
    pub name: &'static str,
    pub extract: ExtractFn,
}

/// A horoscope site and the rules for reading it.
#[derive(Clone, Copy)]
pub struct Source {
    /// Label shown to users and used as the fragment key.
    pub name: &'static str,
    pub url: fn(ZodiacSign) -> String,
    /// Tried in order; the first non-empty result wins.
    pub strategies: &'static [Strategy],
    /// When set, a match shorter than the minimum moves on to the next
    /// strategy instead of ending extraction.
    pub skip_short_matches: bool,
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name).collect::<Vec<_>>(),
            )
            .field("skip_short_matches", &self.skip_short_matches)
            .finish()
    }
}

/// Bounds applied to every extracted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        FetchSettings::default().into()
    }
}

impl From<FetchSettings> for ExtractLimits {
    fn from(settings: FetchSettings) -> Self {
        Self {
            min_chars: settings.fragment_min_chars,
            max_chars: settings.fragment_max_chars,
        }
    }
}

/// All sources in registration order.
pub fn default_sources() -> Vec<Source> {
    vec![mail_ru::source(), rambler::source()]
}

impl Source {
    /// Apply the strategies to a page body and bound the result.
    ///
    /// Returns `None` when no strategy matches or when the match is shorter
    /// than `limits.min_chars`; otherwise the text cut to `limits.max_chars`.
    /// With [`skip_short_matches`](Self::skip_short_matches) a short match
    /// is skipped and the next strategy is tried.
    pub fn extract(&self, body: &str, limits: ExtractLimits) -> Option<String> {
        let document = Html::parse_document(body);
        for strategy in self.strategies {
            let Some(text) = (strategy.extract)(&document).filter(|text| !text.is_empty()) else {
                continue;
            };

            let chars = text.chars().count();
            if chars < limits.min_chars {
                if self.skip_short_matches {
                    debug!(
                        source = self.name,
                        strategy = strategy.name,
                        chars,
                        "Match too short; trying next strategy"
                    );
                    continue;
                }
                warn!(
                    source = self.name,
                    strategy = strategy.name,
                    chars,
                    min = limits.min_chars,
                    "Extracted text too short; discarding"
                );
                return None;
            }
            debug!(source = self.name, strategy = strategy.name, chars, "Strategy matched");
            return Some(truncate_chars(&text, limits.max_chars).to_string());
        }
        None
    }

    /// Fetch this source's page for `sign` and extract a fragment.
    ///
    /// Every failure is soft: it is logged here and reported as `None`.
    #[instrument(level = "info", skip_all, fields(source = self.name, %sign))]
    pub async fn fetch<F: PageFetch>(
        &self,
        fetcher: &F,
        sign: ZodiacSign,
        limits: ExtractLimits,
    ) -> Option<SourceFragment> {
        let url = (self.url)(sign);
        let body = match fetcher.fetch_page(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "Source fetch failed");
                return None;
            }
        };

        match self.extract(&body, limits) {
            Some(text) => {
                info!(chars = text.chars().count(), "Extracted fragment");
                debug!(preview = %truncate_for_log(&text, 80), "Fragment preview");
                Some(SourceFragment {
                    source: self.name.to_string(),
                    text,
                })
            }
            None => {
                warn!(%url, "No usable content found");
                None
            }
        }
    }
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text of every non-empty `<p>` inside the first `container`, joined by a space.
pub fn joined_paragraphs(document: &Html, container: &Selector) -> Option<String> {
    let root = document.select(container).next()?;
    let text = root
        .select(&PARAGRAPH)
        .map(|p| element_text(&p))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Text of the first `<p>` inside the first `container`.
pub fn first_paragraph(document: &Html, container: &Selector) -> Option<String> {
    let root = document.select(container).next()?;
    let paragraph = root.select(&PARAGRAPH).next()?;
    let text = element_text(&paragraph);
    (!text.is_empty()).then_some(text)
}
