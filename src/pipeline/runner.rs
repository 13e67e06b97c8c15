//! Pipeline runner — sequences the translation and speech clients.
//!
//! [`PipelineRunner`] drives one [`RunRequest`] at a time through the state
//! machine in [`super::state`], reporting to a [`PipelineObserver`] along
//! the way:
//!
//! ```text
//! RunMode::TranslateThenSpeak
//!   └─▶ Translating  (progress 20)
//!         └─ ok ──▶ on_translation, progress 50
//!              └─▶ Synthesizing  (progress 60)
//!                    └─ ok ──▶ progress 90, on_audio, progress 100, on_done
//! any client error ──▶ Failed: on_error, on_done, remaining steps skipped
//! ```
//!
//! Failure is terminal for the run — no retry, no partial recovery.  When
//! synthesis fails after a successful translation, the translated text that
//! was already delivered stays valid; only the audio is missing.
//!
//! Cancellation is cooperative: [`RunHandle::cancel`] sets a run-scoped flag
//! that is checked between steps.  An HTTP call already in flight is not
//! aborted; once the flag is set, its result and all further events are
//! suppressed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::api::{
    ApiClientError, SpeechParamError, SpeechRequest, SpeechSynthesizer, Translator, Voice,
    GAIN_DB_RANGE, SPEED_RANGE,
};
use crate::config::TtsConfig;

use super::events::PipelineObserver;
use super::state::{combined_progress, single_progress, RunMode, RunState};

// ---------------------------------------------------------------------------
// RunError
// ---------------------------------------------------------------------------

/// Errors that terminate a pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The input text was empty — rejected before any network call.
    #[error("input text is empty")]
    EmptyInput,

    /// Synthesis parameters were out of range — rejected before dispatch.
    #[error("invalid synthesis parameters: {0}")]
    InvalidParams(#[from] SpeechParamError),

    /// The translation client failed.
    #[error("translation failed: {0}")]
    Translation(ApiClientError),

    /// The speech client failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(ApiClientError),

    /// Internal error (e.g. a panicked task behind a [`RunHandle`]).
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// RunRequest / RunOutcome
// ---------------------------------------------------------------------------

/// One user-initiated pipeline run.
///
/// Every run carries its own synthesis parameters; modes never borrow the
/// gain or speed of another surface's controls.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub mode: RunMode,
    /// Source text (translation input, or speech input in speak-only mode).
    pub text: String,
    pub voice: Voice,
    pub speed: f64,
    pub gain_db: f64,
}

impl RunRequest {
    /// Build a request with the configured default TTS parameters.
    pub fn new(mode: RunMode, text: impl Into<String>, tts: &TtsConfig) -> Self {
        Self {
            mode,
            text: text.into(),
            voice: tts.voice,
            speed: tts.speed,
            gain_db: tts.gain_db,
        }
    }
}

/// Final report of a run, returned by [`PipelineRunner::run`] and
/// [`RunHandle::wait`].
///
/// `translated` stays populated after a synthesis failure in combined mode:
/// the text was already delivered and remains valid even though `audio` is
/// `None`.
#[derive(Debug)]
pub struct RunOutcome {
    pub mode: RunMode,
    /// State the run ended in.  A cancelled run keeps its last work state.
    pub state: RunState,
    pub translated: Option<String>,
    pub audio: Option<Vec<u8>>,
    pub error: Option<RunError>,
    /// Set when the run stopped because its cancel flag was raised.
    pub cancelled: bool,
}

impl RunOutcome {
    fn started(mode: RunMode) -> Self {
        Self {
            mode,
            state: RunState::Idle,
            translated: None,
            audio: None,
            error: None,
            cancelled: false,
        }
    }

    /// `true` when every step of the run completed and delivered its result.
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Completed
    }
}

// ---------------------------------------------------------------------------
// PipelineRunner
// ---------------------------------------------------------------------------

/// Sequences the two API clients for a single run at a time.
///
/// The runner itself holds no per-run state, so it is cheap to clone and a
/// clone can serve each submitted run independently.  Serializing runs per
/// surface (one in flight per tab) is the caller's responsibility.
#[derive(Clone)]
pub struct PipelineRunner {
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl PipelineRunner {
    pub fn new(translator: Arc<dyn Translator>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            translator,
            synthesizer,
        }
    }

    /// Drive `request` to completion, reporting to `observer`.
    ///
    /// `cancel` is checked between steps; see the module docs for the exact
    /// suppression semantics.
    pub async fn run(
        &self,
        request: RunRequest,
        observer: &dyn PipelineObserver,
        cancel: &Arc<AtomicBool>,
    ) -> RunOutcome {
        let mut outcome = RunOutcome::started(request.mode);

        if cancelled(cancel) {
            log::debug!("run cancelled before start");
            outcome.cancelled = true;
            return outcome;
        }

        // Preconditions — reject before any network traffic.
        if request.text.trim().is_empty() {
            return self.fail(outcome, observer, RunError::EmptyInput);
        }
        if request.mode.needs_speech() {
            if !SPEED_RANGE.contains(&request.speed) {
                let err = SpeechParamError::SpeedOutOfRange(request.speed);
                return self.fail(outcome, observer, err.into());
            }
            if !GAIN_DB_RANGE.contains(&request.gain_db) {
                let err = SpeechParamError::GainOutOfRange(request.gain_db);
                return self.fail(outcome, observer, err.into());
            }
        }

        match request.mode {
            RunMode::TranslateThenSpeak => self.run_combined(request, outcome, observer, cancel).await,
            RunMode::TranslateOnly => self.run_translate(request, outcome, observer, cancel).await,
            RunMode::SpeakOnly => self.run_speak(request, outcome, observer, cancel).await,
        }
    }

    /// Spawn `request` on the tokio runtime and return a handle to it.
    pub fn submit(&self, request: RunRequest, observer: Arc<dyn PipelineObserver>) -> RunHandle {
        let cancel = Arc::new(AtomicBool::new(false));
        let runner = self.clone();
        let flag = Arc::clone(&cancel);
        let mode = request.mode;

        let join = tokio::spawn(async move {
            runner.run(request, observer.as_ref(), &flag).await
        });

        RunHandle { mode, cancel, join }
    }

    // -----------------------------------------------------------------------
    // Mode drivers
    // -----------------------------------------------------------------------

    async fn run_combined(
        &self,
        request: RunRequest,
        mut outcome: RunOutcome,
        observer: &dyn PipelineObserver,
        cancel: &Arc<AtomicBool>,
    ) -> RunOutcome {
        use combined_progress as p;

        // ── Step 1/2: translate ─────────────────────────────────────────
        outcome.state = RunState::Translating;
        observer.on_status("1/2: Translating text...");
        observer.on_progress(p::TRANSLATING);

        let translated = match self.translator.translate(&request.text).await {
            Ok(text) => text,
            Err(e) => return self.fail(outcome, observer, RunError::Translation(e)),
        };

        if cancelled(cancel) {
            log::debug!("run cancelled after translation; suppressing results");
            outcome.cancelled = true;
            return outcome;
        }

        // Deliver the translation as soon as it exists, not at the end.
        observer.on_progress(p::TRANSLATED);
        observer.on_translation(&translated);
        outcome.translated = Some(translated.clone());

        // ── Step 2/2: synthesize ────────────────────────────────────────
        outcome.state = RunState::Synthesizing;
        observer.on_status("2/2: Synthesizing speech...");
        observer.on_progress(p::SYNTHESIZING);

        let speech_request = match SpeechRequest::new(
            translated,
            request.voice,
            request.speed,
            request.gain_db,
        ) {
            Ok(req) => req,
            Err(e) => return self.fail(outcome, observer, e.into()),
        };

        let audio = match self.synthesizer.synthesize(&speech_request).await {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(outcome, observer, RunError::Synthesis(e)),
        };

        if cancelled(cancel) {
            log::debug!("run cancelled after synthesis; suppressing results");
            outcome.cancelled = true;
            return outcome;
        }

        observer.on_progress(p::SYNTHESIZED);
        observer.on_audio(&audio);
        outcome.audio = Some(audio);

        observer.on_status("Processing complete.");
        observer.on_progress(p::DONE);
        outcome.state = RunState::Completed;
        observer.on_done();
        outcome
    }

    async fn run_translate(
        &self,
        request: RunRequest,
        mut outcome: RunOutcome,
        observer: &dyn PipelineObserver,
        cancel: &Arc<AtomicBool>,
    ) -> RunOutcome {
        use single_progress as p;

        outcome.state = RunState::Translating;
        observer.on_status("Translating text...");
        observer.on_progress(p::STARTED);

        let translated = match self.translator.translate(&request.text).await {
            Ok(text) => text,
            Err(e) => return self.fail(outcome, observer, RunError::Translation(e)),
        };

        if cancelled(cancel) {
            outcome.cancelled = true;
            return outcome;
        }

        observer.on_progress(p::NEAR_DONE);
        observer.on_translation(&translated);
        outcome.translated = Some(translated);

        observer.on_status("Translation complete.");
        observer.on_progress(p::DONE);
        outcome.state = RunState::Completed;
        observer.on_done();
        outcome
    }

    async fn run_speak(
        &self,
        request: RunRequest,
        mut outcome: RunOutcome,
        observer: &dyn PipelineObserver,
        cancel: &Arc<AtomicBool>,
    ) -> RunOutcome {
        use single_progress as p;

        outcome.state = RunState::Synthesizing;
        observer.on_status("Synthesizing speech...");
        observer.on_progress(p::STARTED);

        let speech_request = match SpeechRequest::new(
            request.text,
            request.voice,
            request.speed,
            request.gain_db,
        ) {
            Ok(req) => req,
            Err(e) => return self.fail(outcome, observer, e.into()),
        };

        let audio = match self.synthesizer.synthesize(&speech_request).await {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(outcome, observer, RunError::Synthesis(e)),
        };

        if cancelled(cancel) {
            outcome.cancelled = true;
            return outcome;
        }

        observer.on_progress(p::NEAR_DONE);
        observer.on_audio(&audio);
        outcome.audio = Some(audio);

        observer.on_status("Audio ready.");
        observer.on_progress(p::DONE);
        outcome.state = RunState::Completed;
        observer.on_done();
        outcome
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn fail(
        &self,
        mut outcome: RunOutcome,
        observer: &dyn PipelineObserver,
        error: RunError,
    ) -> RunOutcome {
        log::error!("pipeline run failed: {error}");
        outcome.state = RunState::Failed;
        observer.on_error(&error);
        observer.on_done();
        outcome.error = Some(error);
        outcome
    }
}

fn cancelled(flag: &Arc<AtomicBool>) -> bool {
    flag.load(Ordering::SeqCst)
}

// ---------------------------------------------------------------------------
// RunHandle
// ---------------------------------------------------------------------------

/// Handle to a run submitted with [`PipelineRunner::submit`].
pub struct RunHandle {
    mode: RunMode,
    cancel: Arc<AtomicBool>,
    join: tokio::task::JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Request cooperative cancellation.  A request already in flight is not
    /// aborted; its result and all further events are suppressed.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Wait for the run to end and return its outcome.
    pub async fn wait(self) -> RunOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => RunOutcome {
                mode: self.mode,
                state: RunState::Failed,
                translated: None,
                audio: None,
                error: Some(RunError::Internal(e.to_string())),
                cancelled: false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::events::NoopObserver;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Translator that always succeeds with a fixed string, counting calls.
    struct OkTranslator {
        result: String,
        calls: AtomicUsize,
        /// When set, raised during the call — simulates the user cancelling
        /// while the HTTP request is in flight.
        raise_on_call: Option<Arc<AtomicBool>>,
    }

    impl OkTranslator {
        fn new(result: &str) -> Self {
            Self {
                result: result.into(),
                calls: AtomicUsize::new(0),
                raise_on_call: None,
            }
        }
    }

    #[async_trait]
    impl Translator for OkTranslator {
        async fn translate(&self, _text: &str) -> Result<String, ApiClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(flag) = &self.raise_on_call {
                flag.store(true, Ordering::SeqCst);
            }
            Ok(self.result.clone())
        }
    }

    /// Translator that always fails with a network error.
    struct FailTranslator;

    #[async_trait]
    impl Translator for FailTranslator {
        async fn translate(&self, _text: &str) -> Result<String, ApiClientError> {
            Err(ApiClientError::Network("connection refused".into()))
        }
    }

    /// Synthesizer returning fixed bytes, recording call count and the text
    /// it was asked to speak.
    struct OkSynthesizer {
        audio: Vec<u8>,
        calls: AtomicUsize,
        last_text: Mutex<Option<String>>,
    }

    impl OkSynthesizer {
        fn new(audio: &[u8]) -> Self {
            Self {
                audio: audio.to_vec(),
                calls: AtomicUsize::new(0),
                last_text: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for OkSynthesizer {
        async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, ApiClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_text.lock().unwrap() = Some(request.text().to_string());
            Ok(self.audio.clone())
        }
    }

    /// Synthesizer that always fails, counting calls.
    struct FailSynthesizer {
        calls: AtomicUsize,
    }

    impl FailSynthesizer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for FailSynthesizer {
        async fn synthesize(&self, _request: &SpeechRequest) -> Result<Vec<u8>, ApiClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiClientError::Api {
                status: 500,
                body: "synthesis backend down".into(),
            })
        }
    }

    /// Observer that records every callback for later inspection.
    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<Recorded>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Recorded {
        Status(String),
        Progress(u8),
        Translation(String),
        Audio(usize),
        Error(String),
        Done,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<Recorded> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PipelineObserver for RecordingObserver {
        fn on_status(&self, message: &str) {
            self.events.lock().unwrap().push(Recorded::Status(message.into()));
        }
        fn on_progress(&self, percent: u8) {
            self.events.lock().unwrap().push(Recorded::Progress(percent));
        }
        fn on_translation(&self, translated: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Recorded::Translation(translated.into()));
        }
        fn on_audio(&self, audio: &[u8]) {
            self.events.lock().unwrap().push(Recorded::Audio(audio.len()));
        }
        fn on_error(&self, error: &RunError) {
            self.events.lock().unwrap().push(Recorded::Error(error.to_string()));
        }
        fn on_done(&self) {
            self.events.lock().unwrap().push(Recorded::Done);
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn combined_request(text: &str) -> RunRequest {
        RunRequest {
            mode: RunMode::TranslateThenSpeak,
            text: text.into(),
            voice: Voice::David,
            speed: 1.0,
            gain_db: 0.0,
        }
    }

    fn progress_values(events: &[Recorded]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                Recorded::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn fresh_flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    // -----------------------------------------------------------------------
    // Combined mode
    // -----------------------------------------------------------------------

    /// Happy path: strictly increasing progress ending at 100, and the
    /// translation event arrives before the audio event.
    #[tokio::test]
    async fn combined_success_orders_events() {
        let translator = Arc::new(OkTranslator::new("你好，世界"));
        let synth = Arc::new(OkSynthesizer::new(&[0xFF, 0xFB, 0x01]));
        let runner = PipelineRunner::new(translator.clone(), synth.clone());
        let observer = RecordingObserver::default();

        let outcome = runner
            .run(combined_request("Hello, world"), &observer, &fresh_flag())
            .await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.state, RunState::Completed);
        assert_eq!(outcome.translated.as_deref(), Some("你好，世界"));
        assert_eq!(outcome.audio.as_deref(), Some(&[0xFF, 0xFB, 0x01][..]));
        assert!(outcome.error.is_none());

        let events = observer.events();

        // Progress strictly increasing, ending at 100.
        let progress = progress_values(&events);
        assert_eq!(progress, vec![20, 50, 60, 90, 100]);
        assert!(progress.windows(2).all(|w| w[0] < w[1]));

        // Translation before audio, and both before done.
        let translation_at = events
            .iter()
            .position(|e| matches!(e, Recorded::Translation(_)))
            .expect("translation event");
        let audio_at = events
            .iter()
            .position(|e| matches!(e, Recorded::Audio(_)))
            .expect("audio event");
        let done_at = events
            .iter()
            .position(|e| matches!(e, Recorded::Done))
            .expect("done event");
        assert!(translation_at < audio_at);
        assert!(audio_at < done_at);

        // The synthesizer was fed the translation, not the source text.
        assert_eq!(
            synth.last_text.lock().unwrap().as_deref(),
            Some("你好，世界")
        );
    }

    /// Translation failure short-circuits: zero synthesis calls.
    #[tokio::test]
    async fn combined_translation_failure_skips_synthesis() {
        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(Arc::new(FailTranslator), synth.clone());
        let observer = RecordingObserver::default();

        let outcome = runner
            .run(combined_request("Hello"), &observer, &fresh_flag())
            .await;

        assert!(!outcome.succeeded());
        assert_eq!(outcome.state, RunState::Failed);
        assert!(matches!(outcome.error, Some(RunError::Translation(_))));
        assert!(outcome.translated.is_none());
        assert!(outcome.audio.is_none());
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);

        let events = observer.events();
        assert!(events.iter().any(|e| matches!(e, Recorded::Error(_))));
        assert!(events.iter().all(|e| !matches!(e, Recorded::Translation(_))));
        assert_eq!(events.last(), Some(&Recorded::Done));
    }

    /// Synthesis failure after a successful translation keeps the already
    /// delivered translation valid; only audio is missing.
    #[tokio::test]
    async fn combined_synthesis_failure_keeps_translation() {
        let runner = PipelineRunner::new(
            Arc::new(OkTranslator::new("早上好")),
            Arc::new(FailSynthesizer::new()),
        );
        let observer = RecordingObserver::default();

        let outcome = runner
            .run(combined_request("Good morning"), &observer, &fresh_flag())
            .await;

        assert_eq!(outcome.state, RunState::Failed);
        assert_eq!(outcome.translated.as_deref(), Some("早上好"));
        assert!(outcome.audio.is_none());
        assert!(matches!(outcome.error, Some(RunError::Synthesis(_))));

        let events = observer.events();
        assert!(events
            .iter()
            .any(|e| matches!(e, Recorded::Translation(t) if t == "早上好")));
        assert!(events.iter().all(|e| !matches!(e, Recorded::Audio(_))));
    }

    // -----------------------------------------------------------------------
    // Single-step modes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn translate_only_never_calls_synthesizer() {
        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(Arc::new(OkTranslator::new("好")), synth.clone());
        let observer = RecordingObserver::default();

        let request = RunRequest {
            mode: RunMode::TranslateOnly,
            ..combined_request("good")
        };
        let outcome = runner.run(request, &observer, &fresh_flag()).await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.translated.as_deref(), Some("好"));
        assert!(outcome.audio.is_none());
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(progress_values(&observer.events()), vec![30, 90, 100]);
    }

    #[tokio::test]
    async fn speak_only_never_calls_translator() {
        let translator = Arc::new(OkTranslator::new("unused"));
        let synth = Arc::new(OkSynthesizer::new(&[9, 9]));
        let runner = PipelineRunner::new(translator.clone(), synth.clone());
        let observer = RecordingObserver::default();

        let request = RunRequest {
            mode: RunMode::SpeakOnly,
            ..combined_request("你好")
        };
        let outcome = runner.run(request, &observer, &fresh_flag()).await;

        assert!(outcome.succeeded());
        assert!(outcome.translated.is_none());
        assert_eq!(outcome.audio.as_deref(), Some(&[9, 9][..]));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(synth.last_text.lock().unwrap().as_deref(), Some("你好"));
        assert_eq!(progress_values(&observer.events()), vec![30, 90, 100]);
    }

    // -----------------------------------------------------------------------
    // Preconditions
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn empty_input_fails_before_any_network_call() {
        let translator = Arc::new(OkTranslator::new("x"));
        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(translator.clone(), synth.clone());

        let outcome = runner
            .run(combined_request("   "), &NoopObserver, &fresh_flag())
            .await;

        assert!(matches!(outcome.error, Some(RunError::EmptyInput)));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn out_of_range_speed_is_rejected_before_dispatch() {
        let translator = Arc::new(OkTranslator::new("x"));
        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(translator.clone(), synth.clone());

        let mut request = combined_request("hello");
        request.speed = 9.0;
        let outcome = runner.run(request, &NoopObserver, &fresh_flag()).await;

        assert!(matches!(
            outcome.error,
            Some(RunError::InvalidParams(SpeechParamError::SpeedOutOfRange(_)))
        ));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn out_of_range_gain_is_rejected_before_dispatch() {
        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(Arc::new(OkTranslator::new("x")), synth.clone());

        let mut request = combined_request("hello");
        request.gain_db = -30.0;
        let outcome = runner.run(request, &NoopObserver, &fresh_flag()).await;

        assert!(matches!(
            outcome.error,
            Some(RunError::InvalidParams(SpeechParamError::GainOutOfRange(_)))
        ));
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    /// Translate-only runs ignore TTS parameters entirely.
    #[tokio::test]
    async fn translate_only_ignores_tts_params() {
        let runner = PipelineRunner::new(
            Arc::new(OkTranslator::new("好")),
            Arc::new(OkSynthesizer::new(&[1])),
        );

        let mut request = combined_request("good");
        request.mode = RunMode::TranslateOnly;
        request.speed = 99.0;
        let outcome = runner.run(request, &NoopObserver, &fresh_flag()).await;

        assert!(outcome.succeeded());
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    /// A flag raised before the run starts suppresses everything.
    #[tokio::test]
    async fn cancel_before_start_emits_nothing() {
        let translator = Arc::new(OkTranslator::new("x"));
        let runner = PipelineRunner::new(translator.clone(), Arc::new(OkSynthesizer::new(&[1])));
        let observer = RecordingObserver::default();

        let flag = Arc::new(AtomicBool::new(true));
        let outcome = runner.run(combined_request("hello"), &observer, &flag).await;

        assert!(outcome.cancelled);
        assert!(observer.events().is_empty());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    /// A flag raised while the translation call is in flight suppresses the
    /// translation result and skips synthesis, but does not abort the call.
    #[tokio::test]
    async fn cancel_during_translation_suppresses_results() {
        let flag = fresh_flag();
        let mut translator = OkTranslator::new("你好");
        translator.raise_on_call = Some(Arc::clone(&flag));

        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(Arc::new(translator), synth.clone());
        let observer = RecordingObserver::default();

        let outcome = runner.run(combined_request("hello"), &observer, &flag).await;

        assert!(outcome.cancelled);
        assert!(outcome.translated.is_none());
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);

        let events = observer.events();
        // Only the pre-call status/progress of step 1 may have been emitted.
        assert!(events.iter().all(|e| {
            !matches!(
                e,
                Recorded::Translation(_) | Recorded::Audio(_) | Recorded::Done
            )
        }));
    }

    // -----------------------------------------------------------------------
    // submit / RunHandle
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn submit_runs_to_completion() {
        let runner = PipelineRunner::new(
            Arc::new(OkTranslator::new("你好")),
            Arc::new(OkSynthesizer::new(&[7, 7, 7])),
        );

        let handle = runner.submit(combined_request("hello"), Arc::new(NoopObserver));
        let outcome = handle.wait().await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.audio.as_deref(), Some(&[7, 7, 7][..]));
    }

    #[tokio::test]
    async fn handle_cancel_stops_submitted_run() {
        /// Translator slow enough that cancel() lands before it returns.
        struct SlowTranslator;

        #[async_trait]
        impl Translator for SlowTranslator {
            async fn translate(&self, _text: &str) -> Result<String, ApiClientError> {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                Ok("late".into())
            }
        }

        let synth = Arc::new(OkSynthesizer::new(&[1]));
        let runner = PipelineRunner::new(Arc::new(SlowTranslator), synth.clone());

        let handle = runner.submit(combined_request("hello"), Arc::new(NoopObserver));
        handle.cancel();
        let outcome = handle.wait().await;

        assert!(outcome.cancelled);
        assert!(outcome.audio.is_none());
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }
}
