//! Command-line interface definitions.
//!
//! Secrets and the model name can be provided via flags or environment
//! variables; everything else lives in the optional YAML config file.

use crate::models::ForecastContext;
use clap::Parser;

/// Command-line arguments for the horoscope aggregator.
///
/// # Examples
///
/// ```sh
/// # Template-only forecast (no GROQ_API_KEY set)
/// horoscope_aggregator "Овен"
///
/// # AI-synthesized forecast with a numerology value
/// GROQ_API_KEY=... horoscope_aggregator "♏ Скорпион" --fate-number 7
///
/// # Same sign twice: the second run is served from the daily cache
/// horoscope_aggregator Лев Лев
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Sign labels to forecast, plain ("Овен"), decorated ("♈ Овен") or canonical ("aries")
    #[arg(required = true)]
    pub signs: Vec<String>,

    /// First number of fate from the user's numerology matrix
    #[arg(short, long)]
    pub fate_number: Option<i64>,

    /// Full forecast context as JSON, e.g. '{"matrix":{"additional":[7,12]}}'
    #[arg(long, value_name = "JSON")]
    pub context: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Groq (or any OpenAI-compatible) API key; without it only templates are used
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Model identifier for the completion endpoint
    #[arg(long, env = "GROQ_MODEL")]
    pub groq_model: Option<String>,
}

impl Cli {
    /// The context to forecast with.
    ///
    /// `--fate-number` wins over the first number of a `--context` payload.
    pub fn forecast_context(&self) -> Result<ForecastContext, serde_json::Error> {
        let context = match &self.context {
            Some(raw) => serde_json::from_str(raw)?,
            None => ForecastContext::default(),
        };
        Ok(match self.fate_number {
            Some(number) => ForecastContext::with_fate_number(number),
            None => context,
        })
    }
}
