//! Remote API clients for voicetrans.
//!
//! This module provides:
//! * [`Translator`] — async trait implemented by translation backends.
//! * [`ApiTranslator`] — OpenAI-compatible `/chat/completions` client.
//! * [`SpeechSynthesizer`] — async trait for text-to-speech backends.
//! * [`ApiSynthesizer`] — `/audio/speech` client returning MP3 bytes.
//! * [`SpeechRequest`] / [`Voice`] — validated synthesis parameters.
//! * [`ApiClientError`] — error taxonomy shared by both clients.
//!
//! Both clients issue exactly one HTTPS request per call with a fixed
//! timeout and no retries; a failed call is terminal for the current
//! pipeline run.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use voicetrans::api::{ApiSynthesizer, ApiTranslator, SpeechRequest,
//!                       SpeechSynthesizer, Translator, Voice};
//! use voicetrans::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ApiConfig::default();
//!
//!     let translator = ApiTranslator::from_config(&config);
//!     let chinese = translator.translate("Good morning!").await?;
//!
//!     let synth = ApiSynthesizer::from_config(&config);
//!     let request = SpeechRequest::new(&chinese, Voice::David, 1.0, 0.0)?;
//!     let mp3 = synth.synthesize(&request).await?;
//!     std::fs::write("out.mp3", mp3)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod speech;
pub mod translator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use error::ApiClientError;
pub use speech::{
    ApiSynthesizer, SpeechParamError, SpeechRequest, SpeechSynthesizer, Voice, GAIN_DB_RANGE,
    SPEED_RANGE,
};
pub use translator::{ApiTranslator, Translator};
