//! Configuration module for voicetrans.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the API and
//! TTS defaults, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{ApiConfig, AppConfig, TtsConfig, API_KEY_ENV};
