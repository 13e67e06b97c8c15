//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::Voice;

use super::AppPaths;

/// Environment variable consulted when `ApiConfig::api_key` is unset.
pub const API_KEY_ENV: &str = "SILICONFLOW_API_KEY";

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Settings for the remote translation / speech provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the provider, without a trailing slash
    /// (e.g. `https://api.siliconflow.cn/v1`).
    pub base_url: String,
    /// Bearer token.  `None` means read [`API_KEY_ENV`] at startup instead;
    /// the key is never written back to disk by this crate.
    pub api_key: Option<String>,
    /// Chat-completions model used for translation.
    pub translation_model: String,
    /// TTS model; also the prefix of the wire-level voice string
    /// (`"<model>:<voice>"`).
    pub tts_model: String,
    /// Per-request timeout for `/chat/completions` in seconds.
    pub translate_timeout_secs: u64,
    /// Per-request timeout for `/audio/speech` in seconds.  Longer than the
    /// translation timeout because synthesis of long passages is slow.
    pub speech_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.siliconflow.cn/v1".into(),
            api_key: None,
            translation_model: "Qwen/QwQ-32B".into(),
            tts_model: "FunAudioLLM/CosyVoice2-0.5B".into(),
            translate_timeout_secs: 90,
            speech_timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// Resolve the bearer token: explicit config value first, then the
    /// [`API_KEY_ENV`] environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Default synthesis parameters applied when the caller does not override
/// them per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Named speaker identity.
    pub voice: Voice,
    /// Playback speed multiplier (0.25 – 4.0).
    pub speed: f64,
    /// Post-synthesis loudness adjustment in decibels (-20.0 – 20.0).
    pub gain_db: f64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            speed: 1.0,
            gain_db: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voicetrans::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote provider settings.
    pub api: ApiConfig,
    /// Default TTS parameters.
    pub tts: TtsConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
