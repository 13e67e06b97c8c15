//! Command-line entry point — voicetrans.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse CLI arguments.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Read the input text (file argument or stdin).
//! 5. Build the API clients and the [`PipelineRunner`].
//! 6. Submit the run; print status/progress events as they arrive.
//! 7. Export the translation / MP3 and optionally play the audio through
//!    the selected [`AudioSink`].

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use voicetrans::api::{ApiSynthesizer, ApiTranslator, Voice};
use voicetrans::audio::select_sink;
use voicetrans::config::{AppConfig, API_KEY_ENV};
use voicetrans::pipeline::{
    ChannelObserver, PipelineEvent, PipelineRunner, RunMode, RunRequest,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Translate English text to Simplified Chinese and synthesize speech.
#[derive(Debug, Parser)]
#[command(name = "voicetrans", version, about)]
struct Cli {
    /// Input text file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Pipeline mode.
    #[arg(long, value_enum, default_value_t = CliMode::TranslateSpeak)]
    mode: CliMode,

    /// Voice name (david, alex, default).  Defaults to the configured voice.
    #[arg(long)]
    voice: Option<Voice>,

    /// Playback speed multiplier, 0.25–4.0.
    #[arg(long)]
    speed: Option<f64>,

    /// Loudness gain in dB, -20.0–20.0.
    #[arg(long)]
    gain: Option<f64>,

    /// Write the synthesized MP3 here.
    #[arg(long, value_name = "FILE")]
    out_audio: Option<PathBuf>,

    /// Write the translated text here.
    #[arg(long, value_name = "FILE")]
    out_text: Option<PathBuf>,

    /// Play the synthesized audio through the default output device.
    #[arg(long)]
    play: bool,

    /// Use an explicit settings file instead of the platform default.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliMode {
    /// Translate only.
    Translate,
    /// Synthesize the input text as-is.
    Speak,
    /// Translate, then synthesize the translation.
    TranslateSpeak,
}

impl From<CliMode> for RunMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Translate => RunMode::TranslateOnly,
            CliMode::Speak => RunMode::SpeakOnly,
            CliMode::TranslateSpeak => RunMode::TranslateThenSpeak,
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };

    if config.api.resolve_api_key().is_none() {
        bail!(
            "no API key configured — set api_key in settings.toml or the {API_KEY_ENV} \
             environment variable"
        );
    }

    let text = read_input(cli.input.as_deref())?;
    let mode: RunMode = cli.mode.into();

    // Per-run parameters: CLI overrides fall back to the configured defaults.
    let mut request = RunRequest::new(mode, text, &config.tts);
    if let Some(voice) = cli.voice {
        request.voice = voice;
    }
    if let Some(speed) = cli.speed {
        request.speed = speed;
    }
    if let Some(gain) = cli.gain {
        request.gain_db = gain;
    }

    let runner = PipelineRunner::new(
        Arc::new(ApiTranslator::from_config(&config.api)),
        Arc::new(ApiSynthesizer::from_config(&config.api)),
    );

    let (observer, mut events) = ChannelObserver::new();
    let handle = runner.submit(request, Arc::new(observer));

    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::Status { message } => eprintln!("{message}"),
            PipelineEvent::Progress { percent } => eprintln!("  [{percent:>3}%]"),
            PipelineEvent::TranslationReady { translated } => println!("{translated}"),
            PipelineEvent::AudioReady { audio } => {
                log::info!("received {} audio bytes", audio.len());
            }
            PipelineEvent::Error { message } => eprintln!("error: {message}"),
            PipelineEvent::Done => {}
        }
    }

    let outcome = handle.wait().await;

    if let (Some(path), Some(translated)) = (&cli.out_text, &outcome.translated) {
        std::fs::write(path, translated)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("translation written to {}", path.display());
    }

    if let Some(audio) = &outcome.audio {
        if let Some(path) = &cli.out_audio {
            std::fs::write(path, audio)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("audio written to {}", path.display());
        }

        if cli.play {
            let sink = select_sink();
            log::info!("playing audio via {}", sink.backend_name());
            let bytes = audio.clone();
            tokio::task::spawn_blocking(move || sink.play(&bytes))
                .await
                .context("playback task panicked")?
                .context("audio playback failed")?;
        }
    }

    if let Some(error) = outcome.error {
        bail!(error);
    }
    Ok(())
}

/// Read the source text from a file, or stdin when no path is given.
fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
