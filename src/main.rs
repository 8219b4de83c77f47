//! # Horoscope Aggregator
//!
//! Prints today's forecast for every sign label given on the command line.
//!
//! ## Usage
//!
//! ```sh
//! GROQ_API_KEY=... horoscope_aggregator "♈ Овен" Лев --fate-number 7
//! ```
//!
//! Labels that resolve to the same sign are served from the daily cache
//! after the first one.

use clap::Parser;
use horoscope_aggregator::cli::Cli;
use horoscope_aggregator::config::AppConfig;
use horoscope_aggregator::{HoroscopeEngine, normalize};
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("horoscope_aggregator starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(signs = ?args.signs, fate_number = ?args.fate_number, config = ?args.config, "Parsed CLI arguments");

    let context = args.forecast_context()?;
    debug!(fate_number = ?context.first_fate_number(), "Forecast context");

    // ---- Load config ----
    let config =
        AppConfig::load(args.config.as_deref())?.with_overrides(args.groq_api_key, args.groq_model);
    info!(
        utc_offset_minutes = config.utc_offset_minutes,
        fetch_timeout_secs = config.fetch.timeout_secs,
        "Loaded configuration"
    );

    let engine = HoroscopeEngine::from_config(&config)?;

    // ---- Forecasts ----
    for label in &args.signs {
        let sign = normalize(label);
        let forecast = engine.daily_forecast(label, &context).await?;
        println!("{} {}\n", sign.glyph(), sign.display_name());
        println!("{forecast}\n");
    }

    let cached = engine.cache().len()?;
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        cached,
        "Execution complete"
    );

    Ok(())
}
