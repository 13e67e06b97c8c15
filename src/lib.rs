//! voicetrans — translate English text to Simplified Chinese and speak it.
//!
//! The library is the reusable core behind the CLI: two HTTP clients for an
//! OpenAI-compatible provider (chat-completions translation, `/audio/speech`
//! TTS), a pipeline runner that sequences them per run mode, an observer
//! contract for status/progress/result delivery, and an `AudioSink`
//! capability for playback.
//!
//! # Modules
//!
//! * [`api`] — `Translator` / `SpeechSynthesizer` traits and their HTTP
//!   implementations, plus the shared [`api::ApiClientError`] taxonomy.
//! * [`pipeline`] — `PipelineRunner`, run modes, the per-run state machine,
//!   cooperative cancellation via `RunHandle`, and `PipelineObserver`.
//! * [`audio`] — playback capability (`RodioSink` / `NullSink`).
//! * [`config`] — TOML-persisted settings and platform paths.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voicetrans::api::{ApiSynthesizer, ApiTranslator};
//! use voicetrans::config::AppConfig;
//! use voicetrans::pipeline::{NoopObserver, PipelineRunner, RunMode, RunRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let runner = PipelineRunner::new(
//!         Arc::new(ApiTranslator::from_config(&config.api)),
//!         Arc::new(ApiSynthesizer::from_config(&config.api)),
//!     );
//!
//!     let request = RunRequest::new(RunMode::TranslateThenSpeak, "Hello!", &config.tts);
//!     let handle = runner.submit(request, Arc::new(NoopObserver));
//!     let outcome = handle.wait().await;
//!
//!     if let Some(audio) = outcome.audio {
//!         std::fs::write("hello.mp3", audio)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audio;
pub mod config;
pub mod pipeline;
