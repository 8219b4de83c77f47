//! In-memory stand-ins for the network seams, shared by the unit tests.

use crate::api::AskAsync;
use crate::error::{AskError, FetchError};
use crate::http::PageFetch;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves canned pages by URL; unknown URLs answer `404`.
#[derive(Debug, Default)]
pub(crate) struct StubFetcher {
    pages: Mutex<HashMap<String, String>>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(self, url: &str, body: &str) -> Self {
        self.set_page(url, body);
        self
    }

    pub(crate) fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// Replace a page after the fetcher has been handed out.
    pub(crate) fn set_page(&self, url: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    /// Number of `fetch_page` calls so far, including failed ones.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageFetch for StubFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        let page = self.pages.lock().unwrap().get(url).cloned();
        page.ok_or(FetchError::Status(404))
    }
}

/// What a [`StubAsk`] does when asked.
#[derive(Debug, Clone)]
pub(crate) enum StubAnswer {
    Text(String),
    Fail,
    /// Never answers within any test timeout.
    Hang,
}

#[derive(Debug)]
pub(crate) struct StubAsk {
    answer: StubAnswer,
    last: Mutex<Option<(String, String)>>,
    calls: AtomicUsize,
}

impl StubAsk {
    pub(crate) fn new(answer: StubAnswer) -> Self {
        Self {
            answer,
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(system, prompt)` pair of the latest call.
    pub(crate) fn last_request(&self) -> Option<(String, String)> {
        self.last.lock().unwrap().clone()
    }
}

impl AskAsync for StubAsk {
    async fn ask(&self, system: &str, prompt: &str) -> Result<String, AskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((system.to_string(), prompt.to_string()));
        match &self.answer {
            StubAnswer::Text(text) => Ok(text.clone()),
            StubAnswer::Fail => Err(AskError::Status {
                status: 503,
                body: "upstream unavailable".to_string(),
            }),
            StubAnswer::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }

    fn model(&self) -> &str {
        "stub"
    }
}

/// A Mail.ru-shaped page whose article paragraphs mention `word`.
pub(crate) fn article_page(word: &str) -> String {
    format!(
        r#"<html><body>
<div class="article__item">
  <p>{word}: сегодня звезды благоволят новым начинаниям и смелым решениям.</p>
  <p>{word}: вечером стоит уделить время близким и отдохнуть от суеты.</p>
</div>
</body></html>"#
    )
}

/// A Rambler-shaped page whose first article paragraph mentions `word`.
pub(crate) fn rambler_page(word: &str) -> String {
    format!(
        r#"<html><body>
<div data-mt-part="article">
  <p>{word}: день подходит для спокойной работы и планирования будущего.</p>
  <p>Этот абзац не попадает в выдержку.</p>
</div>
</body></html>"#
    )
}
