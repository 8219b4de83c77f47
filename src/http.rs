//! Page retrieval for source extractors.
//!
//! [`PageFetch`] is the seam between the scrapers and the network: the
//! production [`HttpFetcher`] wraps a shared `reqwest::Client`, and tests
//! substitute an in-memory implementation.

use crate::error::FetchError;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// Retrieve the body of a page.
///
/// Implementations must treat anything other than `200 OK` as an error.
#[allow(async_fn_in_trait)]
pub trait PageFetch {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// The header set a desktop Chrome sends for a top-level navigation.
///
/// `Accept-Encoding` is added by reqwest itself from the enabled
/// decompression features (gzip, deflate, br).
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

/// HTTP fetcher for public horoscope pages.
///
/// Certificate verification is disabled: the sources are low-trust public
/// pages and some serve broken chains.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetch for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Non-200 response");
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        info!(
            chars = body.chars().count(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert_eq!(
            headers.get(header::ACCEPT_LANGUAGE).unwrap(),
            "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"
        );
        assert_eq!(headers.get(header::UPGRADE_INSECURE_REQUESTS).unwrap(), "1");
        assert!(headers.get(header::ACCEPT).unwrap().to_str().unwrap().starts_with("text/html"));
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(10)).is_ok());
    }
}
