//! LLM API interaction.
//!
//! The synthesizer talks to the model through the [`AskAsync`] trait so
//! tests can swap in a scripted backend. The production implementation,
//! [`ChatCompletionClient`], speaks the OpenAI-compatible chat-completions
//! protocol, which Groq (the default) and most self-hosted servers accept.
//!
//! Calls are never retried; a failed call falls back to the template.

use crate::config::AiSettings;
use crate::error::AskError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a system persona and a user prompt to a model and
/// return its raw text answer.
#[allow(async_fn_in_trait)]
pub trait AskAsync {
    async fn ask(&self, system: &str, prompt: &str) -> Result<String, AskError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionClient {
    /// Build a client from settings.
    ///
    /// Returns `Ok(None)` when no credential is configured, so the caller
    /// can settle on the template composer once at startup.
    pub fn from_settings(settings: &AiSettings) -> Result<Option<Self>, AskError> {
        let Some(api_key) = settings.credential() else {
            return Ok(None);
        };
        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Some(Self {
            http,
            endpoint: chat_endpoint(&settings.api_base),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
        }))
    }
}

/// `{api_base}/chat/completions`, tolerating a trailing slash on the base.
pub fn chat_endpoint(api_base: &str) -> String {
    format!("{}/chat/completions", api_base.trim_end_matches('/'))
}

impl AskAsync for ChatCompletionClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, system: &str, prompt: &str) -> Result<String, AskError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "Completion rejected");
            return Err(AskError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let body: ChatResponse = resp.json().await?;
        let content = first_content(body);
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = content.chars().count(),
            "Completion received"
        );
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn first_content(body: ChatResponse) -> String {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default()
}
