//! Pipeline orchestrator module for voicetrans.
//!
//! This module sequences the translation and speech clients for the three
//! run modes and reports status, progress and results to an observer.
//!
//! # Architecture
//!
//! ```text
//! RunRequest { mode, text, voice, speed, gain_db }
//!        │
//!        ▼
//! PipelineRunner::run() / ::submit() ─▶ RunHandle { cancel, wait }
//!        │
//!        ├─ TranslateOnly       → Translator
//!        ├─ SpeakOnly           → SpeechSynthesizer
//!        └─ TranslateThenSpeak  → Translator ──▶ SpeechSynthesizer
//!
//! PipelineObserver  ←── on_status / on_progress / on_translation /
//!                        on_audio / on_error / on_done
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voicetrans::api::{ApiSynthesizer, ApiTranslator};
//! use voicetrans::config::AppConfig;
//! use voicetrans::pipeline::{ChannelObserver, PipelineRunner, RunMode, RunRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!
//!     let runner = PipelineRunner::new(
//!         Arc::new(ApiTranslator::from_config(&config.api)),
//!         Arc::new(ApiSynthesizer::from_config(&config.api)),
//!     );
//!
//!     let (observer, mut events) = ChannelObserver::new();
//!     let request = RunRequest::new(RunMode::TranslateThenSpeak, "Hello!", &config.tts);
//!     let handle = runner.submit(request, Arc::new(observer));
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!     let outcome = handle.wait().await;
//!     assert!(outcome.succeeded());
//! }
//! ```

pub mod events;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use events::{ChannelObserver, NoopObserver, PipelineEvent, PipelineObserver};
pub use runner::{PipelineRunner, RunError, RunHandle, RunOutcome, RunRequest};
pub use state::{RunMode, RunState};
