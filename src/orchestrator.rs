//! Concurrent fetch across all registered sources.
//!
//! Every source runs as its own future inside one `join_all`, so the
//! fetches overlap on the current task without spawning. Each future is
//! wrapped so that it always settles to an explicit [`FetchOutcome`]: a
//! deadline, a panic inside a scraper, or a soft failure all become values
//! rather than escaping into the collector.

use crate::http::PageFetch;
use crate::models::{FragmentSet, SourceFragment};
use crate::scrapers::{ExtractLimits, Source};
use crate::zodiac::ZodiacSign;
use futures::FutureExt;
use futures::future::join_all;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// How one source's fetch settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fragment(SourceFragment),
    /// The source answered but yielded nothing usable (already logged).
    Empty,
    TimedOut,
    Panicked,
}

/// Runs every registered [`Source`] against one sign.
#[derive(Debug)]
pub struct FetchOrchestrator<F> {
    fetcher: F,
    sources: Vec<Source>,
    timeout: Duration,
    limits: ExtractLimits,
}

impl<F: PageFetch> FetchOrchestrator<F> {
    /// `timeout` bounds each source independently.
    pub fn new(fetcher: F, sources: Vec<Source>, timeout: Duration, limits: ExtractLimits) -> Self {
        Self {
            fetcher,
            sources,
            timeout,
            limits,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch all sources concurrently and collect the successes.
    ///
    /// Fragments appear in registration order regardless of which request
    /// finished first. An empty set is a normal result.
    #[instrument(level = "info", skip(self), fields(sources = self.sources.len()))]
    pub async fn fetch_all(&self, sign: ZodiacSign) -> FragmentSet {
        let t0 = Instant::now();
        let outcomes = join_all(self.sources.iter().map(|source| self.settle(source, sign))).await;
        let fragments = collect_fragments(outcomes);
        info!(
            collected = fragments.len(),
            total = self.sources.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched horoscope sources"
        );
        fragments
    }

    async fn settle(&self, source: &Source, sign: ZodiacSign) -> FetchOutcome {
        let fetch = AssertUnwindSafe(source.fetch(&self.fetcher, sign, self.limits)).catch_unwind();
        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(Some(fragment))) => FetchOutcome::Fragment(fragment),
            Ok(Ok(None)) => FetchOutcome::Empty,
            Ok(Err(_)) => {
                error!(source = source.name, "Source extractor panicked");
                FetchOutcome::Panicked
            }
            Err(_) => {
                warn!(
                    source = source.name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Source timed out"
                );
                FetchOutcome::TimedOut
            }
        }
    }
}

/// Keep only the fragments, preserving the order of `outcomes`.
pub fn collect_fragments(outcomes: Vec<FetchOutcome>) -> FragmentSet {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            FetchOutcome::Fragment(fragment) => Some(fragment),
            _ => None,
        })
        .collect()
}
