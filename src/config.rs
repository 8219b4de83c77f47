//! Runtime configuration.
//!
//! Configuration is read from an optional YAML file; every section and field
//! has a default, so a partial file (or no file at all) is valid. Secrets are
//! never read from the file: the API key comes from the CLI or the
//! `GROQ_API_KEY` environment variable and is applied with
//! [`AppConfig::with_overrides`].
//!
//! ```yaml
//! utc_offset_minutes: 180
//! fetch:
//!   timeout_secs: 10
//!   fragment_max_chars: 600
//!   fragment_min_chars: 50
//! ai:
//!   api_base: https://api.groq.com/openai/v1
//!   model: llama-3.1-8b-instant
//!   temperature: 0.7
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Default model when neither the file nor the environment names one.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Offset east of UTC used to decide which calendar day it is.
    pub utc_offset_minutes: i32,
    pub fetch: FetchSettings,
    pub ai: AiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 180,
            fetch: FetchSettings::default(),
            ai: AiSettings::default(),
        }
    }
}

/// Source-fetching limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    /// Fragments are cut to this many characters.
    pub fragment_max_chars: usize,
    /// Extractions shorter than this are treated as noise.
    pub fragment_min_chars: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            fragment_max_chars: 600,
            fragment_min_chars: 50,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// LLM backend settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiSettings {
    /// Never deserialized from or written to the file.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Each fragment is cut to this many characters inside the prompt.
    pub prompt_fragment_chars: usize,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 1200,
            timeout_secs: 30,
            prompt_fragment_chars: 400,
        }
    }
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The key, if one is configured and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl AppConfig {
    /// Load configuration from `path`, or defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, model = %config.ai.model, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply values that come from the command line or the environment.
    pub fn with_overrides(mut self, api_key: Option<String>, model: Option<String>) -> Self {
        if api_key.is_some() {
            self.ai.api_key = api_key;
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.ai.model = model;
        }
        self
    }
}
