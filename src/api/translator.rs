//! Core `Translator` trait and `ApiTranslator` implementation.
//!
//! `ApiTranslator` calls an OpenAI-compatible `/chat/completions` endpoint
//! with a fixed English → Simplified Chinese instruction prompt.  All
//! connection details come from [`ApiConfig`]; nothing is hardcoded.

use async_trait::async_trait;

use crate::api::error::{pretty_body, ApiClientError};
use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for text translation.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Translator>`).
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` to Simplified Chinese.
    ///
    /// On success the returned string is non-empty, trimmed, and has a
    /// single pair of enclosing double quotes removed if the upstream model
    /// wrapped its output in them.
    async fn translate(&self, text: &str) -> Result<String, ApiClientError>;
}

// ---------------------------------------------------------------------------
// ApiTranslator
// ---------------------------------------------------------------------------

/// Calls the provider's OpenAI-compatible `/chat/completions` endpoint.
///
/// One outbound HTTPS request per call, fixed timeout from
/// `ApiConfig::translate_timeout_secs`, no retries.
pub struct ApiTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ApiTranslator {
    /// Build an `ApiTranslator` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout.  The
    /// bearer token is resolved from the config / environment; an empty
    /// token simply omits the `Authorization` header.
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.translate_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key().unwrap_or_default(),
            model: config.translation_model.clone(),
        }
    }

    /// Instruction prompt sent as the single user message.
    fn build_prompt(text: &str) -> String {
        format!(
            "Translate the following text to Simplified Chinese. \
             Output only the translation itself, without any introductory phrases.\n\n\
             Original Text:\n{text}\n\nSimplified Chinese Translation:"
        )
    }

    /// Wire-level request body.  Field values must match the upstream
    /// provider contract exactly.
    fn build_request_body(model: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model":             model,
            "messages":          [ { "role": "user", "content": prompt } ],
            "max_tokens":        2048,
            "temperature":       0.5,
            "stream":            false,
            "top_p":             0.7,
            "frequency_penalty": 0.0,
            "n":                 1,
            "response_format":   { "type": "text" }
        })
    }

    /// Pull the translated text out of a chat-completions response.
    ///
    /// Fails with [`ApiClientError::MalformedResponse`] when the expected
    /// `choices[0].message.content` path is missing or empty after trimming.
    fn extract_content(json: &serde_json::Value) -> Result<String, ApiClientError> {
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ApiClientError::MalformedResponse(
                    "missing choices[0].message.content".into(),
                )
            })?;

        let content = strip_enclosing_quotes(content.trim()).trim();

        if content.is_empty() {
            return Err(ApiClientError::MalformedResponse(
                "empty translation content".into(),
            ));
        }

        Ok(content.to_string())
    }
}

/// Remove a single pair of enclosing double quotes, if present.
///
/// The upstream model sometimes wraps its output in quotes; unquoted input
/// passes through unchanged, so the operation is idempotent.
fn strip_enclosing_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[async_trait]
impl Translator for ApiTranslator {
    async fn translate(&self, text: &str) -> Result<String, ApiClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_request_body(&self.model, &Self::build_prompt(text));

        log::debug!("translate: POST {url} (model={}, len={})", self.model, text.len());

        let mut req = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            log::error!("translate: HTTP {status}");
            return Err(ApiClientError::Api {
                status: status.as_u16(),
                body: pretty_body(&raw),
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiClientError::MalformedResponse(e.to_string()))?;

        Self::extract_content(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
