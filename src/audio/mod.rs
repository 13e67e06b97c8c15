//! Audio playback module for voicetrans.
//!
//! Provides the [`AudioSink`] capability trait, the rodio-backed
//! [`RodioSink`] (feature `playback`), the no-op [`NullSink`], and
//! [`select_sink`] which decides availability once at startup.

pub mod sink;

pub use sink::{select_sink, AudioError, AudioSink, NullSink};

#[cfg(feature = "playback")]
pub use sink::RodioSink;
