//! Run modes, the per-run state machine, and progress checkpoints.
//!
//! [`RunState`] drives the orchestrator's state machine; the runner reports
//! the final state back to the caller in its outcome.
//!
//! ```text
//! Idle ──combined mode──▶ Translating ──▶ Synthesizing ──▶ Completed
//!      ──translate only─▶ Translating ──────────────────▶ Completed
//!      ──speak only─────▶ Synthesizing ─────────────────▶ Completed
//! any work state ──client failure──▶ Failed
//! ```
//!
//! Progress checkpoints are fixed per mode so observers always see a
//! strictly increasing sequence ending at 100 on success:
//! combined runs report 20 / 50 / 60 / 90 / 100, single-step runs
//! 30 / 90 / 100.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RunMode
// ---------------------------------------------------------------------------

/// Which pipeline steps a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Translate to Simplified Chinese; no audio.
    TranslateOnly,
    /// Synthesize the input text as-is; no translation.
    SpeakOnly,
    /// Translate, then synthesize the translation (combined mode).
    TranslateThenSpeak,
}

impl RunMode {
    /// Whether this mode invokes the translation client.
    pub fn needs_translation(&self) -> bool {
        matches!(self, RunMode::TranslateOnly | RunMode::TranslateThenSpeak)
    }

    /// Whether this mode invokes the speech client.
    pub fn needs_speech(&self) -> bool {
        matches!(self, RunMode::SpeakOnly | RunMode::TranslateThenSpeak)
    }

    /// A short human-readable label suitable for status display.
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::TranslateOnly => "Translate",
            RunMode::SpeakOnly => "Speak",
            RunMode::TranslateThenSpeak => "Translate + Speak",
        }
    }
}

// ---------------------------------------------------------------------------
// RunState
// ---------------------------------------------------------------------------

/// States of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Created but not started yet.
    #[default]
    Idle,
    /// The translation request is in flight.
    Translating,
    /// The synthesis request is in flight.
    Synthesizing,
    /// All steps finished; results were delivered.
    Completed,
    /// A step failed; remaining steps were skipped.
    Failed,
}

impl RunState {
    /// Returns `true` while a remote call is (or may be) in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, RunState::Translating | RunState::Synthesizing)
    }

    /// Returns `true` once the run can no longer make progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }

    /// A short human-readable label suitable for display in a status bar.
    pub fn label(&self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::Translating => "Translating",
            RunState::Synthesizing => "Synthesizing",
            RunState::Completed => "Done",
            RunState::Failed => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// Progress checkpoints
// ---------------------------------------------------------------------------

/// Progress checkpoints for combined (translate-then-speak) runs.
pub mod combined_progress {
    pub const TRANSLATING: u8 = 20;
    pub const TRANSLATED: u8 = 50;
    pub const SYNTHESIZING: u8 = 60;
    pub const SYNTHESIZED: u8 = 90;
    pub const DONE: u8 = 100;
}

/// Progress checkpoints for single-step runs.
pub mod single_progress {
    pub const STARTED: u8 = 30;
    pub const NEAR_DONE: u8 = 90;
    pub const DONE: u8 = 100;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- RunMode ---

    #[test]
    fn combined_mode_needs_both_steps() {
        assert!(RunMode::TranslateThenSpeak.needs_translation());
        assert!(RunMode::TranslateThenSpeak.needs_speech());
    }

    #[test]
    fn single_modes_need_one_step() {
        assert!(RunMode::TranslateOnly.needs_translation());
        assert!(!RunMode::TranslateOnly.needs_speech());
        assert!(!RunMode::SpeakOnly.needs_translation());
        assert!(RunMode::SpeakOnly.needs_speech());
    }

    // ---- RunState ---

    #[test]
    fn work_states_are_busy() {
        assert!(!RunState::Idle.is_busy());
        assert!(RunState::Translating.is_busy());
        assert!(RunState::Synthesizing.is_busy());
        assert!(!RunState::Completed.is_busy());
        assert!(!RunState::Failed.is_busy());
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Translating.is_terminal());
        assert!(!RunState::Synthesizing.is_terminal());
        assert!(RunState::Completed.is_terminal());
        assert!(RunState::Failed.is_terminal());
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }

    // ---- checkpoints ---

    #[test]
    fn combined_checkpoints_are_strictly_increasing() {
        use combined_progress::*;
        let seq = [TRANSLATING, TRANSLATED, SYNTHESIZING, SYNTHESIZED, DONE];
        assert!(seq.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(DONE, 100);
    }

    #[test]
    fn single_checkpoints_are_strictly_increasing() {
        use single_progress::*;
        assert!(STARTED < NEAR_DONE && NEAR_DONE < DONE);
        assert_eq!(DONE, 100);
    }
}
