//! `AudioSink` capability trait and its implementations.
//!
//! Playback availability is decided once at startup by [`select_sink`];
//! call sites always talk to an `Arc<dyn AudioSink>` and never check for
//! the backend themselves.  [`RodioSink`] is compiled only with the
//! `playback` feature; [`NullSink`] discards audio and is the fallback
//! when no output device can be opened.

use std::sync::Arc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors that can occur during audio playback.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device / backend available.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    /// The bytes could not be decoded as audio.
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// The device rejected playback after decoding succeeded.
    #[error("playback failed: {0}")]
    Playback(String),
}

// ---------------------------------------------------------------------------
// AudioSink trait
// ---------------------------------------------------------------------------

/// Capability interface for playing encoded audio.
///
/// `play` blocks until playback finishes, so callers on an async runtime
/// should wrap it in `tokio::task::spawn_blocking`.
pub trait AudioSink: Send + Sync {
    /// Decode and play `mp3_bytes` to completion.
    fn play(&self, mp3_bytes: &[u8]) -> Result<(), AudioError>;

    /// Backend name for logging / display.
    fn backend_name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// NullSink
// ---------------------------------------------------------------------------

/// Discards audio.  Selected when playback is unavailable so the rest of
/// the pipeline (translate, synthesize, export) keeps working.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, mp3_bytes: &[u8]) -> Result<(), AudioError> {
        log::info!(
            "audio playback disabled; discarding {} bytes",
            mp3_bytes.len()
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "null"
    }
}

// ---------------------------------------------------------------------------
// RodioSink  (feature = "playback")
// ---------------------------------------------------------------------------

/// Plays MP3 bytes through the default output device via rodio.
///
/// The output stream is opened per call: rodio's stream handle is not
/// `Send`, and a run plays at most one clip.
#[cfg(feature = "playback")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioSink;

#[cfg(feature = "playback")]
impl AudioSink for RodioSink {
    fn play(&self, mp3_bytes: &[u8]) -> Result<(), AudioError> {
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;
        let sink = rodio::Sink::try_new(&handle)
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        let cursor = std::io::Cursor::new(mp3_bytes.to_vec());
        let source = rodio::Decoder::new(cursor)
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "rodio"
    }
}

// ---------------------------------------------------------------------------
// select_sink
// ---------------------------------------------------------------------------

/// Pick the playback backend once at startup.
///
/// With the `playback` feature enabled this probes the default output
/// device and returns [`RodioSink`] when it opens; otherwise (or when the
/// feature is off) it falls back to [`NullSink`].
pub fn select_sink() -> Arc<dyn AudioSink> {
    #[cfg(feature = "playback")]
    {
        match rodio::OutputStream::try_default() {
            Ok(_probe) => {
                log::info!("audio playback: rodio (default output device)");
                return Arc::new(RodioSink);
            }
            Err(e) => {
                log::warn!("no audio output device ({e}); playback disabled");
            }
        }
    }

    log::info!("audio playback: disabled");
    Arc::new(NullSink)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_any_bytes() {
        let sink = NullSink;
        assert!(sink.play(&[]).is_ok());
        assert!(sink.play(&[0xFF, 0xFB, 0x90]).is_ok());
        assert_eq!(sink.backend_name(), "null");
    }

    #[test]
    fn null_sink_is_object_safe() {
        let sink: Arc<dyn AudioSink> = Arc::new(NullSink);
        assert!(sink.play(&[1, 2, 3]).is_ok());
    }

    /// `select_sink` must always return a usable sink, device or not.
    #[test]
    fn select_sink_never_fails() {
        let sink = select_sink();
        assert!(!sink.backend_name().is_empty());
    }
}
