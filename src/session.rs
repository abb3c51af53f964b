//! # Scan Session Controller
//!
//! Orchestrates the per-frame and per-photo recognition cycle: normalize the
//! recognized strings, probe for the ingredients header, run the phrase
//! matcher, pass results through duplicate suppression, update UI-facing
//! state, and fire cooldown-gated feedback.
//!
//! One controller owns one session's state for the lifetime of a scan.
//! Recognition callbacks arrive asynchronously from the platform; they are
//! funneled through a single serialized intake path (`run_recognition_intake`
//! over a tokio channel, or direct calls under the session lock) and applied
//! in arrival order. Each session carries a generation counter; results for
//! a stale or retaken session are discarded rather than applied.

use crate::config::ScannerConfig;
use crate::dictionary::{AllergenDictionary, SelectedAllergens};
use crate::errors::AppResult;
use crate::feedback::{CooldownGate, FeedbackSink};
use crate::language::{ScanLanguage, Script};
use crate::matcher::{MatchEvent, PhraseMatcher};
use crate::normalizer::normalize;
use crate::suppression::MatchSuppressor;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Where the session is in its per-capture cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No active recognition
    Idle,
    /// Frames/photo recognition in progress
    Scanning,
    /// Ingredients header was seen in the most recent pass
    IngredientsDetected,
    /// Terminal per-capture state after a still photo was evaluated
    AllergenChecked,
}

/// UI-facing status taxonomy. "Ingredients not found" and "allergen-free"
/// are distinct members and must never be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    None,
    Scanning,
    AllergenFree,
    IngredientsNotFound,
    LanguageMismatch(Script),
}

/// Whether a recognition result came from the live feed or a still photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionKind {
    Frame,
    Photo,
}

/// One Text Recognizer callback, tagged with the session generation it was
/// produced for. An empty `lines` list models a failed OCR cycle.
#[derive(Debug, Clone)]
pub struct RecognitionEvent {
    pub generation: u64,
    pub kind: RecognitionKind,
    pub lines: Vec<String>,
}

/// Per-session orchestrator owning all mutable scan state.
///
/// The dictionary and selected-allergen set are read-only snapshots taken at
/// construction; editing the selection mid-scan takes effect only on the
/// next session (or explicit retake with a rebuilt controller).
pub struct ScanSessionController {
    config: ScannerConfig,
    dictionary: Arc<AllergenDictionary>,
    selected: SelectedAllergens,
    language: ScanLanguage,
    matcher: PhraseMatcher,
    suppressor: MatchSuppressor,
    feedback: CooldownGate,
    generation: u64,
    state: ScanState,
    status: StatusMessage,
    detected_matches: Vec<MatchEvent>,
    has_ingredient_marker: bool,
}

impl ScanSessionController {
    pub fn new(
        config: ScannerConfig,
        dictionary: Arc<AllergenDictionary>,
        selected: SelectedAllergens,
        sink: Arc<dyn FeedbackSink>,
    ) -> AppResult<Self> {
        config.validate()?;
        let matcher = PhraseMatcher::with_config(config.matcher.clone())?;
        let language = ScanLanguage::from_locale(&config.locale);
        let feedback = CooldownGate::new(sink, config.feedback_cooldown());

        info!(
            locale = %config.locale,
            dictionary_terms = dictionary.len(),
            selected = selected.len(),
            "Created scan session controller"
        );

        Ok(Self {
            config,
            dictionary,
            selected,
            language,
            matcher,
            suppressor: MatchSuppressor::new(),
            feedback,
            generation: 0,
            state: ScanState::Idle,
            status: StatusMessage::None,
            detected_matches: Vec::new(),
            has_ingredient_marker: false,
        })
    }

    /// Begin a new scan cycle. Returns the generation tag that recognition
    /// events must carry to be applied to this session.
    pub fn start_scan(&mut self) -> u64 {
        self.generation += 1;
        self.clear_capture_state();
        self.state = ScanState::Scanning;
        self.status = StatusMessage::Scanning;
        debug!(generation = self.generation, "Scan session started");
        self.generation
    }

    /// Discard the session entirely and start over within the same flow.
    ///
    /// Matches, the suppression set, flags, and the feedback gate are all
    /// cleared, so a previously-matched term re-triggers feedback on rematch.
    pub fn retake(&mut self) -> u64 {
        debug!(generation = self.generation, "Retake requested");
        self.feedback.reset();
        self.start_scan()
    }

    /// Leave the scan flow. Stale callbacks for the old generation are
    /// discarded from here on.
    pub fn finish(&mut self) {
        self.generation += 1;
        self.clear_capture_state();
        self.state = ScanState::Idle;
        self.status = StatusMessage::None;
        debug!("Scan session finished");
    }

    fn clear_capture_state(&mut self) {
        self.detected_matches.clear();
        self.suppressor.reset();
        self.has_ingredient_marker = false;
    }

    /// Single intake point for recognition events, applied in arrival order
    pub fn apply(&mut self, event: RecognitionEvent) {
        match event.kind {
            RecognitionKind::Frame => self.ingest_frame(event.generation, &event.lines),
            RecognitionKind::Photo => self.ingest_photo(event.generation, &event.lines),
        }
    }

    /// Process one live-feed recognition pass.
    ///
    /// A failed OCR cycle (no lines) is ignored without touching accumulated
    /// state. Stale-generation results are discarded.
    pub fn ingest_frame(&mut self, generation: u64, lines: &[String]) {
        if !self.accepts(generation) {
            return;
        }
        if lines.is_empty() {
            debug!("Empty recognition result, skipping cycle");
            return;
        }

        let text = normalize(&lines.join("\n"));
        if text.is_empty() {
            return;
        }

        self.probe_ingredient_marker(&text);

        let matches = self
            .matcher
            .find_matches(&text, &self.dictionary, &self.selected);

        // Live mode forgets terms that left the frame so they can re-alert
        if self.config.evict_on_disappear {
            self.suppressor.evict_missing(&text, &self.detected_matches);
        }

        self.record_accepted(matches);

        // Advisory only; scanning continues either way
        if let Some(script) = self.language.mismatch(&text) {
            self.status = StatusMessage::LanguageMismatch(script);
        } else if matches_scanning_status(self.status) {
            self.status = StatusMessage::Scanning;
        }
    }

    /// Process a captured still photo and settle the terminal status.
    pub fn ingest_photo(&mut self, generation: u64, lines: &[String]) {
        if !self.accepts(generation) {
            return;
        }

        let text = normalize(&lines.join("\n"));
        if !text.is_empty() {
            self.probe_ingredient_marker(&text);

            // The matcher always runs; language mismatch is guidance, not a gate
            let matches = self
                .matcher
                .find_matches(&text, &self.dictionary, &self.selected);
            self.record_accepted(matches);
        }

        self.state = ScanState::AllergenChecked;
        self.status = if !self.detected_matches.is_empty() {
            StatusMessage::None
        } else if self.has_ingredient_marker {
            StatusMessage::AllergenFree
        } else if let Some(script) = self.language.mismatch(&text) {
            StatusMessage::LanguageMismatch(script)
        } else {
            StatusMessage::IngredientsNotFound
        };

        info!(
            generation = self.generation,
            matches = self.detected_matches.len(),
            status = ?self.status,
            "Photo evaluation complete"
        );
    }

    fn accepts(&self, generation: u64) -> bool {
        if self.state == ScanState::Idle {
            debug!("No active session, discarding recognition result");
            return false;
        }
        if generation != self.generation {
            debug!(
                event_generation = generation,
                current_generation = self.generation,
                "Discarding recognition result for stale session"
            );
            return false;
        }
        true
    }

    fn probe_ingredient_marker(&mut self, normalized_text: &str) {
        if self.language.has_ingredient_keyword(normalized_text) {
            if !self.has_ingredient_marker {
                debug!("Ingredients header detected");
            }
            self.has_ingredient_marker = true;
            if self.state == ScanState::Scanning {
                self.state = ScanState::IngredientsDetected;
            }
        }
    }

    fn record_accepted(&mut self, matches: Vec<MatchEvent>) {
        for event in self.suppressor.accept(matches) {
            info!(
                term = %event.term,
                category = %event.category,
                phrase = %event.phrase,
                "Allergen match accepted"
            );
            self.detected_matches.push(event);
            // One feedback attempt per newly-accepted match; the gate's
            // cooldown decides whether it actually fires
            self.feedback.fire();
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn status(&self) -> StatusMessage {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn detected_matches(&self) -> &[MatchEvent] {
        &self.detected_matches
    }

    pub fn has_ingredient_marker(&self) -> bool {
        self.has_ingredient_marker
    }

    pub fn alerted_count(&self) -> usize {
        self.suppressor.alerted_count()
    }
}

fn matches_scanning_status(status: StatusMessage) -> bool {
    matches!(
        status,
        StatusMessage::Scanning | StatusMessage::LanguageMismatch(_)
    )
}

/// Shared handle serializing all mutation of one session's state
pub type SharedScanSession = Arc<Mutex<ScanSessionController>>;

/// Wrap a controller for use across async recognition callbacks
pub fn create_shared_session(controller: ScanSessionController) -> SharedScanSession {
    Arc::new(Mutex::new(controller))
}

/// Funnel recognition events onto the session in arrival order.
///
/// This is the asynchronous boundary to the Frame Source / Text Recognizer
/// collaborators: producers push `RecognitionEvent`s into the channel from
/// wherever callbacks land, and this task applies them one at a time under
/// the session lock. Runs until the channel closes.
pub async fn run_recognition_intake(
    session: SharedScanSession,
    mut events: mpsc::Receiver<RecognitionEvent>,
) {
    while let Some(event) = events.recv().await {
        session.lock().apply(event);
    }
    debug!("Recognition intake channel closed");
}
