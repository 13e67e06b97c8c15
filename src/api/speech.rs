//! Core `SpeechSynthesizer` trait and `ApiSynthesizer` implementation.
//!
//! `ApiSynthesizer` calls the provider's `/audio/speech` endpoint and
//! returns raw MP3 bytes.  Parameter validation happens in
//! [`SpeechRequest::new`], before any network traffic — out-of-range values
//! never reach the wire.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::error::{pretty_body, ApiClientError};
use crate::config::ApiConfig;

/// Valid playback speed multipliers accepted by the provider.
pub const SPEED_RANGE: RangeInclusive<f64> = 0.25..=4.0;

/// Valid loudness gain in decibels accepted by the provider.
pub const GAIN_DB_RANGE: RangeInclusive<f64> = -20.0..=20.0;

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// Named speaker identity selecting synthesis timbre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    David,
    Alex,
    #[default]
    Default,
}

impl Voice {
    /// Wire-level voice name (the part after the `<model>:` prefix).
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::David => "david",
            Voice::Alex => "alex",
            Voice::Default => "default",
        }
    }

    /// All selectable voices, in display order.
    pub const ALL: [Voice; 3] = [Voice::David, Voice::Alex, Voice::Default];
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "david" => Ok(Voice::David),
            "alex" => Ok(Voice::Alex),
            "default" => Ok(Voice::Default),
            other => Err(format!("unknown voice {other:?} (expected david, alex or default)")),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechRequest
// ---------------------------------------------------------------------------

/// A caller-side precondition violation, detected before dispatch.
#[derive(Debug, Error, PartialEq)]
pub enum SpeechParamError {
    #[error("speech input text is empty")]
    EmptyText,

    #[error("speed {0} outside valid range 0.25–4.0")]
    SpeedOutOfRange(f64),

    #[error("gain {0} dB outside valid range -20.0–20.0")]
    GainOutOfRange(f64),
}

/// Validated synthesis parameters.
///
/// Construction through [`SpeechRequest::new`] guarantees non-empty text and
/// in-range speed / gain, so a `SpeechRequest` can always be dispatched
/// as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    text: String,
    voice: Voice,
    speed: f64,
    gain_db: f64,
}

impl SpeechRequest {
    /// Validate and build a request.  Values are passed to the provider
    /// exactly as given here.
    pub fn new(
        text: impl Into<String>,
        voice: Voice,
        speed: f64,
        gain_db: f64,
    ) -> Result<Self, SpeechParamError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SpeechParamError::EmptyText);
        }
        if !SPEED_RANGE.contains(&speed) {
            return Err(SpeechParamError::SpeedOutOfRange(speed));
        }
        if !GAIN_DB_RANGE.contains(&gain_db) {
            return Err(SpeechParamError::GainOutOfRange(gain_db));
        }
        Ok(Self {
            text,
            voice,
            speed,
            gain_db,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Parameter summary attached to content-type errors.
    fn describe(&self) -> String {
        format!(
            "voice={}, speed={}, gain={} dB",
            self.voice, self.speed, self.gain_db
        )
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech synthesis.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `request` and return encoded MP3 bytes.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ApiClientError>;
}

// ---------------------------------------------------------------------------
// ApiSynthesizer
// ---------------------------------------------------------------------------

/// Calls the provider's `/audio/speech` endpoint.
///
/// One outbound HTTPS request per call with a longer timeout than the
/// translation client (synthesis of long passages is slow), streamed body
/// reassembly, no retries, no caching.
pub struct ApiSynthesizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ApiSynthesizer {
    /// Build an `ApiSynthesizer` from application config.
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.speech_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key().unwrap_or_default(),
            model: config.tts_model.clone(),
        }
    }

    /// The provider addresses voices as `"<model>:<voice>"`.
    fn voice_string(&self, voice: Voice) -> String {
        format!("{}:{}", self.model, voice.as_str())
    }

    /// Wire-level request body.
    fn build_request_body(&self, request: &SpeechRequest) -> serde_json::Value {
        serde_json::json!({
            "model":           self.model,
            "input":           request.text(),
            "voice":           self.voice_string(request.voice()),
            "response_format": "mp3",
            "speed":           request.speed(),
            "gain":            request.gain_db(),
        })
    }
}

/// A 2xx response counts as audio only when its `Content-Type` says so.
fn is_audio_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("audio")
}

#[async_trait]
impl SpeechSynthesizer for ApiSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ApiClientError> {
        let url = format!("{}/audio/speech", self.base_url);
        let body = self.build_request_body(request);

        log::debug!(
            "synthesize: POST {url} ({}, len={})",
            request.describe(),
            request.text().len()
        );

        let mut req = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            log::error!("synthesize: HTTP {status}");
            return Err(ApiClientError::Api {
                status: status.as_u16(),
                body: pretty_body(&raw),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !is_audio_content_type(&content_type) {
            log::error!("synthesize: 2xx but content-type {content_type:?}");
            return Err(ApiClientError::UnexpectedContentType {
                content_type,
                detail: request.describe(),
            });
        }

        // Reassemble the streamed body.
        let mut audio = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        log::debug!("synthesize: received {} audio bytes", audio.len());
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
