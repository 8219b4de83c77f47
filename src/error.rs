//! Error types for the aggregation pipeline.
//!
//! Only [`ForecastError`] ever reaches a caller of the engine. The other
//! enums describe failures that are absorbed inside their own layer:
//!
//! - [`FetchError`]: a source page could not be retrieved (soft failure, logged)
//! - [`AskError`]: the LLM backend failed (absorbed by the template fallback)
//! - [`ConfigError`]: the configuration file could not be loaded (binary only)

use thiserror::Error;

/// Failure to retrieve one source page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure, including the client's own request timeout.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with anything other than `200 OK`.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Failure of a single LLM completion call.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion timed out after {0} ms")]
    Timeout(u128),

    /// The model answered, but with nothing usable after trimming.
    #[error("completion was empty")]
    Empty,
}

/// Fatal defects surfaced by the engine.
///
/// Everything recoverable is already folded into a valid forecast before
/// these can occur, so seeing one means a bug, not an outage.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The cache lock was poisoned by a panic in another task.
    #[error("daily cache is poisoned")]
    CachePoisoned,

    /// Writing the template into its buffer failed.
    #[error("template composition failed: {0}")]
    Template(#[from] std::fmt::Error),
}

/// Failure to load the YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
