//! # Horoscope Aggregator
//!
//! Collects today's horoscope for a zodiac sign from several public Russian
//! horoscope sites, then synthesizes one forecast from whatever was
//! collected: a fixed template, or a single narrative written by an
//! OpenAI-compatible LLM (Groq by default) when an API key is configured.
//!
//! ## Features
//!
//! - Accepts loose sign labels (`"Овен"`, `"♈ Овен"`, `"aries"`) and never
//!   rejects one; unknown labels resolve to Aries
//! - Fetches every source concurrently with a per-source deadline, and
//!   tolerates any subset of sources failing
//! - Falls back from the AI narrative to the template on any AI failure
//! - Caches one forecast per sign per calendar day (UTC+3 by default)
//!
//! ## Architecture
//!
//! 1. **Normalize**: [`zodiac::normalize`] maps the raw label to a [`ZodiacSign`]
//! 2. **Cache**: [`cache::DailyCache`] answers repeated requests for the day
//! 3. **Fetch**: [`orchestrator::FetchOrchestrator`] runs every [`scrapers::Source`]
//! 4. **Synthesize**: [`synthesizer::Synthesizer`] writes the forecast text
//!
//! [`HoroscopeEngine`] ties the four together.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod outputs;
pub mod scrapers;
pub mod synthesizer;
pub mod utils;
pub mod zodiac;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::HoroscopeEngine;
pub use error::ForecastError;
pub use models::ForecastContext;
pub use zodiac::{ZodiacSign, normalize};
