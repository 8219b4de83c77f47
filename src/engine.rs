//! The aggregation engine: the one entry point outer layers call.
//!
//! ```text
//! raw label ─ normalize ─▶ DailyCache ─ hit ─────────────────────▶ forecast
//!                               └─ miss ─▶ FetchOrchestrator ─▶ Synthesizer ─┘
//! ```

use crate::api::{AskAsync, ChatCompletionClient};
use crate::cache::DailyCache;
use crate::config::AppConfig;
use crate::error::{FetchError, ForecastError};
use crate::http::{HttpFetcher, PageFetch};
use crate::models::ForecastContext;
use crate::orchestrator::FetchOrchestrator;
use crate::scrapers::{ExtractLimits, default_sources};
use crate::synthesizer::Synthesizer;
use crate::utils::offset_from_minutes;
use crate::zodiac::normalize;
use std::time::Instant;
use tracing::{info, instrument};

/// Normalizes signs, consults the cache and drives fetch plus synthesis.
#[derive(Debug)]
pub struct HoroscopeEngine<F = HttpFetcher, A = ChatCompletionClient> {
    orchestrator: FetchOrchestrator<F>,
    synthesizer: Synthesizer<A>,
    cache: DailyCache,
}

impl HoroscopeEngine<HttpFetcher, ChatCompletionClient> {
    /// Build the production engine: real HTTP, the default sources, and an
    /// AI composer if a credential is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.fetch.timeout())?;
        let orchestrator = FetchOrchestrator::new(
            fetcher,
            default_sources(),
            config.fetch.timeout(),
            ExtractLimits::from(config.fetch.clone()),
        );
        let synthesizer = Synthesizer::from_settings(&config.ai);
        let cache = DailyCache::new(offset_from_minutes(config.utc_offset_minutes));
        Ok(Self::new(orchestrator, synthesizer, cache))
    }
}

impl<F: PageFetch, A: AskAsync> HoroscopeEngine<F, A> {
    pub fn new(orchestrator: FetchOrchestrator<F>, synthesizer: Synthesizer<A>, cache: DailyCache) -> Self {
        Self {
            orchestrator,
            synthesizer,
            cache,
        }
    }

    pub fn cache(&self) -> &DailyCache {
        &self.cache
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator<F> {
        &self.orchestrator
    }

    pub fn synthesizer(&self) -> &Synthesizer<A> {
        &self.synthesizer
    }

    /// Today's forecast for a raw sign label.
    ///
    /// Any label is accepted; unknown ones resolve to the default sign.
    /// Source and AI failures are absorbed into the forecast text, so an
    /// `Err` here always means a defect (poisoned cache, template failure).
    #[instrument(level = "info", skip(self, context))]
    pub async fn daily_forecast(
        &self,
        raw_sign: &str,
        context: &ForecastContext,
    ) -> Result<String, ForecastError> {
        let sign = normalize(raw_sign);
        self.cache
            .get_or_compute(sign, move |key| async move {
                let t0 = Instant::now();
                info!(%sign, day = %key.day, "Generating forecast");
                let fragments = self.orchestrator.fetch_all(sign).await;
                let forecast = self
                    .synthesizer
                    .synthesize(sign, key.day, context, &fragments)
                    .await?;
                info!(
                    %sign,
                    chars = forecast.chars().count(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Forecast ready"
                );
                Ok(forecast)
            })
            .await
    }
}
