//! Observer contract for pipeline runs.
//!
//! [`PipelineObserver`] replaces toolkit-bound signal/slot notification with
//! plain callbacks invocable from any execution context; the calling surface
//! decides how to marshal them onto its own UI thread.  [`ChannelObserver`]
//! adapts the callbacks into a [`PipelineEvent`] stream over a tokio mpsc
//! channel for frontends that prefer to poll.

use tokio::sync::mpsc;

use super::runner::RunError;

// ---------------------------------------------------------------------------
// PipelineObserver
// ---------------------------------------------------------------------------

/// Callbacks emitted by a pipeline run, in order of occurrence.
///
/// All methods default to no-ops so implementors only handle what they care
/// about.  For a combined run the sequence on success is:
/// status → progress* → `on_translation` → status → progress* →
/// `on_audio` → `on_progress(100)` → `on_done`.  On failure `on_error` is
/// followed by `on_done`; a cancelled run stops emitting entirely.
pub trait PipelineObserver: Send + Sync {
    /// Human-readable status line (e.g. `"1/2: Translating text..."`).
    fn on_status(&self, _message: &str) {}

    /// Progress checkpoint, 0–100, strictly increasing within a run.
    fn on_progress(&self, _percent: u8) {}

    /// Translated text, emitted as soon as step 1 finishes — before
    /// synthesis starts in combined mode.
    fn on_translation(&self, _translated: &str) {}

    /// Encoded MP3 bytes.
    fn on_audio(&self, _audio: &[u8]) {}

    /// Terminal failure of the current run.
    fn on_error(&self, _error: &RunError) {}

    /// The run has ended (after success or failure, not after cancellation).
    fn on_done(&self) {}
}

/// Observer that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

// ---------------------------------------------------------------------------
// PipelineEvent / ChannelObserver
// ---------------------------------------------------------------------------

/// Owned event form of the observer callbacks, for channel transport.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Status { message: String },
    Progress { percent: u8 },
    TranslationReady { translated: String },
    AudioReady { audio: Vec<u8> },
    Error { message: String },
    Done,
}

/// Forwards observer callbacks as [`PipelineEvent`]s over an unbounded
/// channel.  Unbounded because the callbacks are synchronous and must not
/// block the run; a pipeline emits a small, fixed number of events.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<PipelineEvent>,
}

impl ChannelObserver {
    /// Create the observer together with the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PipelineEvent) {
        // Receiver gone means nobody is listening any more; drop silently.
        let _ = self.tx.send(event);
    }
}

impl PipelineObserver for ChannelObserver {
    fn on_status(&self, message: &str) {
        self.send(PipelineEvent::Status {
            message: message.to_string(),
        });
    }

    fn on_progress(&self, percent: u8) {
        self.send(PipelineEvent::Progress { percent });
    }

    fn on_translation(&self, translated: &str) {
        self.send(PipelineEvent::TranslationReady {
            translated: translated.to_string(),
        });
    }

    fn on_audio(&self, audio: &[u8]) {
        self.send(PipelineEvent::AudioReady {
            audio: audio.to_vec(),
        });
    }

    fn on_error(&self, error: &RunError) {
        self.send(PipelineEvent::Error {
            message: error.to_string(),
        });
    }

    fn on_done(&self) {
        self.send(PipelineEvent::Done);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Every callback must arrive as the matching event, in order.
    #[test]
    fn channel_observer_forwards_all_callbacks() {
        let (observer, mut rx) = ChannelObserver::new();

        observer.on_status("1/2: Translating text...");
        observer.on_progress(20);
        observer.on_translation("你好");
        observer.on_audio(&[1, 2, 3]);
        observer.on_done();

        assert!(matches!(
            rx.try_recv().unwrap(),
            PipelineEvent::Status { message } if message == "1/2: Translating text..."
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            PipelineEvent::Progress { percent: 20 }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            PipelineEvent::TranslationReady { translated } if translated == "你好"
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            PipelineEvent::AudioReady { audio } if audio == vec![1, 2, 3]
        ));
        assert!(matches!(rx.try_recv().unwrap(), PipelineEvent::Done));
        assert!(rx.try_recv().is_err());
    }

    /// A dropped receiver must not panic the sender.
    #[test]
    fn dropped_receiver_is_tolerated() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        observer.on_status("still alive");
        observer.on_done();
    }

    /// The no-op observer is usable as a trait object.
    #[test]
    fn noop_observer_is_object_safe() {
        let observer: Box<dyn PipelineObserver> = Box::new(NoopObserver);
        observer.on_progress(50);
        observer.on_done();
    }
}
