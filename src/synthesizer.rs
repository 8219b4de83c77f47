//! Forecast synthesis: template composition or AI narrative.
//!
//! The choice of composer is made once, when the [`Synthesizer`] is built:
//! without a credential (or if the client cannot be built) the process runs
//! with [`Composer::Template`] for its whole lifetime. With an AI composer,
//! every failure of the AI path, including an empty answer, falls through to
//! the very same template call the template-only composer makes.

use crate::api::{AskAsync, ChatCompletionClient};
use crate::config::AiSettings;
use crate::error::{AskError, ForecastError};
use crate::models::{ForecastContext, FragmentSet};
use crate::outputs::prompt::{PERSONA, build_prompt};
use crate::outputs::template;
use crate::utils::truncate_for_log;
use crate::zodiac::ZodiacSign;
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// The forecast-writing capability selected at startup.
#[derive(Debug)]
pub enum Composer<A> {
    Template,
    Ai(AiComposer<A>),
}

/// Writes one narrative from all fragments through an LLM backend.
#[derive(Debug)]
pub struct AiComposer<A> {
    backend: A,
    timeout: Duration,
    fragment_chars: usize,
}

impl<A: AskAsync> AiComposer<A> {
    pub fn new(backend: A, timeout: Duration, fragment_chars: usize) -> Self {
        Self {
            backend,
            timeout,
            fragment_chars,
        }
    }

    /// One completion call, bounded by the composer's own timeout.
    #[instrument(level = "info", skip_all, fields(%sign, model = %self.backend.model()))]
    pub async fn compose(
        &self,
        sign: ZodiacSign,
        day: NaiveDate,
        context: &ForecastContext,
        fragments: &FragmentSet,
    ) -> Result<String, AskError> {
        let prompt = build_prompt(sign, day, context, fragments, self.fragment_chars);
        debug!(prompt_chars = prompt.chars().count(), "Built prompt");

        let t0 = Instant::now();
        let answer = tokio::time::timeout(self.timeout, self.backend.ask(PERSONA, &prompt))
            .await
            .map_err(|_| AskError::Timeout(self.timeout.as_millis()))??;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AskError::Empty);
        }
        info!(
            chars = answer.chars().count(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "AI forecast generated"
        );
        debug!(preview = %truncate_for_log(answer, 120), "AI forecast preview");
        Ok(answer.to_string())
    }
}

/// Produces the final forecast text from collected fragments.
#[derive(Debug)]
pub struct Synthesizer<A = ChatCompletionClient> {
    composer: Composer<A>,
}

impl Synthesizer<ChatCompletionClient> {
    /// Decide the composer from configuration, once.
    pub fn from_settings(settings: &AiSettings) -> Self {
        match ChatCompletionClient::from_settings(settings) {
            Ok(Some(client)) => {
                info!(model = %settings.model, api_base = %settings.api_base, "AI composer enabled");
                Self::with_backend(client, settings.timeout(), settings.prompt_fragment_chars)
            }
            Ok(None) => {
                warn!("No API key configured; forecasts will use the template only");
                Self::template()
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize AI client; forecasts will use the template only");
                Self::template()
            }
        }
    }
}

impl<A: AskAsync> Synthesizer<A> {
    /// Template-only synthesizer.
    pub fn template() -> Self {
        Self {
            composer: Composer::Template,
        }
    }

    pub fn with_backend(backend: A, timeout: Duration, fragment_chars: usize) -> Self {
        Self {
            composer: Composer::Ai(AiComposer::new(backend, timeout, fragment_chars)),
        }
    }

    pub fn composer(&self) -> &Composer<A> {
        &self.composer
    }

    pub fn is_ai_enabled(&self) -> bool {
        matches!(self.composer, Composer::Ai(_))
    }

    /// Produce the forecast for `sign` on `day`.
    ///
    /// The AI path is only attempted with an AI composer and at least one
    /// fragment. AI failures are logged and absorbed; the only error left is
    /// a template formatting failure.
    #[instrument(level = "info", skip(self, context, fragments), fields(fragments = fragments.len()))]
    pub async fn synthesize(
        &self,
        sign: ZodiacSign,
        day: NaiveDate,
        context: &ForecastContext,
        fragments: &FragmentSet,
    ) -> Result<String, ForecastError> {
        match &self.composer {
            Composer::Ai(ai) if !fragments.is_empty() => {
                match ai.compose(sign, day, context, fragments).await {
                    Ok(text) => return Ok(text),
                    Err(e) => error!(error = %e, "AI generation failed; falling back to template"),
                }
            }
            Composer::Ai(_) => info!("No fragments collected; using template"),
            Composer::Template => debug!("Template composer"),
        }
        Ok(template::compose(day, fragments)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFragment;
    use crate::test_support::{StubAsk, StubAnswer};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn two_fragments() -> FragmentSet {
        [("Mail.ru", "Первый источник говорит о переменах."), ("Rambler", "Второй источник советует отдых.")]
            .into_iter()
            .map(|(source, text)| SourceFragment {
                source: source.to_string(),
                text: text.to_string(),
            })
            .collect()
    }

    fn ai(answer: StubAnswer) -> Synthesizer<StubAsk> {
        Synthesizer::with_backend(StubAsk::new(answer), Duration::from_millis(200), 400)
    }

    #[tokio::test]
    async fn test_ai_answer_is_trimmed() {
        let synth = ai(StubAnswer::Text("  💫 **Общий прогноз:** всё хорошо.  \n".into()));
        let text = synth
            .synthesize(ZodiacSign::Leo, day(), &ForecastContext::default(), &two_fragments())
            .await
            .unwrap();
        assert_eq!(text, "💫 **Общий прогноз:** всё хорошо.");
    }

    #[tokio::test]
    async fn test_ai_receives_persona_and_prompt() {
        let synth = ai(StubAnswer::Text("ok".into()));
        synth
            .synthesize(ZodiacSign::Leo, day(), &ForecastContext::with_fate_number(9), &two_fragments())
            .await
            .unwrap();
        let Composer::Ai(composer) = synth.composer() else {
            panic!("expected AI composer");
        };
        let (system, prompt) = composer.backend.last_request().unwrap();
        assert_eq!(system, PERSONA);
        assert!(prompt.contains("• Mail.ru: Первый источник"));
        assert!(prompt.contains("Первое число судьбы: 9"));
    }

    #[tokio::test]
    async fn test_ai_failures_fall_back_to_template() {
        let expected = template::compose(day(), &two_fragments()).unwrap();
        for answer in [
            StubAnswer::Fail,
            StubAnswer::Text("   \n ".into()),
            StubAnswer::Hang,
        ] {
            let synth = ai(answer);
            let text = synth
                .synthesize(ZodiacSign::Leo, day(), &ForecastContext::default(), &two_fragments())
                .await
                .unwrap();
            assert_eq!(text, expected);
        }
    }

    #[tokio::test]
    async fn test_empty_fragments_skip_ai() {
        let synth = ai(StubAnswer::Text("should not be used".into()));
        let text = synth
            .synthesize(ZodiacSign::Leo, day(), &ForecastContext::default(), &FragmentSet::new())
            .await
            .unwrap();
        assert_eq!(text, template::compose(day(), &FragmentSet::new()).unwrap());
        let Composer::Ai(composer) = synth.composer() else {
            panic!("expected AI composer");
        };
        assert_eq!(composer.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_degradation_is_total() {
        let empty = FragmentSet::new();
        let full = two_fragments();
        for fragments in [&empty, &full] {
            let template_only = Synthesizer::<StubAsk>::template();
            let failing = ai(StubAnswer::Fail);
            for synth in [&template_only, &failing] {
                let text = synth
                    .synthesize(ZodiacSign::Pisces, day(), &ForecastContext::default(), fragments)
                    .await
                    .unwrap();
                assert!(!text.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_missing_key_forces_template() {
        let synth = Synthesizer::from_settings(&AiSettings::default());
        assert!(!synth.is_ai_enabled());

        let settings = AiSettings {
            api_key: Some("gsk_test".into()),
            ..AiSettings::default()
        };
        assert!(Synthesizer::from_settings(&settings).is_ai_enabled());
    }
}
