//! Recording session state
//!
//! The capture adapter reports typed transition outcomes
//! ([`CaptureUpdate`]) instead of ad hoc callback branching, and
//! [`SessionState`] is the single owner of all UI-visible state,
//! mutated only through its transition methods. This keeps the
//! one-active-session invariant checkable without a rendering layer.

use crate::anecdotes::DisplayAnecdote;
use crate::voice::VoiceInfo;

/// Phase of the capture adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapturePhase {
    /// No active recognition session
    #[default]
    Idle,
    /// A recognition session is running
    Recording,
    /// Capture finished, transcript is being processed
    Analyzing,
}

/// Typed outcome of a capture transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureUpdate {
    /// Incremental transcript; replaces the previous value
    Partial(String),
    /// Session ended (stop or natural end) with the final transcript
    Completed(String),
    /// Session failed with a provider-supplied error code
    Failed(String),
}

/// UI-visible state for one recording cycle
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: CapturePhase,
    /// Current transcript, replaced on every partial update
    pub transcript: String,
    /// Matched anecdotes from the last completed cycle
    pub anecdotes: Vec<DisplayAnecdote>,
    /// User-visible error, if any
    pub error: Option<String>,
    /// Available synthesis voices
    pub voices: Vec<VoiceInfo>,
    /// Identifier of the selected voice
    pub selected_voice: Option<String>,
}

impl SessionState {
    /// Create an empty session state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new recording cycle
    ///
    /// Unconditionally clears the prior transcript, anecdotes, and
    /// error. A no-op while a session is already recording.
    pub fn begin_recording(&mut self) {
        if self.phase == CapturePhase::Recording {
            return;
        }
        self.transcript.clear();
        self.anecdotes.clear();
        self.error = None;
        self.phase = CapturePhase::Recording;
    }

    /// Apply a capture transition outcome
    pub fn apply(&mut self, update: CaptureUpdate) {
        match update {
            CaptureUpdate::Partial(text) => {
                if self.phase == CapturePhase::Recording {
                    self.transcript = text;
                }
            }
            CaptureUpdate::Completed(text) => {
                if self.phase == CapturePhase::Recording {
                    self.transcript = text;
                    self.phase = CapturePhase::Analyzing;
                }
            }
            CaptureUpdate::Failed(code) => {
                self.error = Some(format!("Error recognizing speech: {code}"));
                self.phase = CapturePhase::Idle;
            }
        }
    }

    /// Record a capability error outside any session
    ///
    /// Used when speech recognition itself is unavailable (no input
    /// device, no STT provider configured).
    pub fn fail_unsupported(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.phase = CapturePhase::Idle;
    }

    /// Finish the processing step with the matched anecdotes
    pub fn finish(&mut self, anecdotes: Vec<DisplayAnecdote>) {
        self.anecdotes = anecdotes;
        self.phase = CapturePhase::Idle;
    }

    /// Select a synthesis voice by identifier
    pub fn select_voice(&mut self, voice_id: impl Into<String>) {
        self.selected_voice = Some(voice_id.into());
    }

    /// Whether a recognition session is active
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.phase == CapturePhase::Recording
    }

    /// Whether the post-capture processing step is running
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == CapturePhase::Analyzing
    }

    /// Current capture phase
    #[must_use]
    pub const fn phase(&self) -> CapturePhase {
        self.phase
    }

    /// Label for the record control, reflecting the current phase
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self.phase {
            CapturePhase::Recording => "Stop Recording",
            CapturePhase::Analyzing => "Analyzing...",
            CapturePhase::Idle => "Record Voice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DisplayAnecdote {
        DisplayAnecdote {
            country: "Japan".to_string(),
            capital: "Tokyo".to_string(),
            anecdote: "X".to_string(),
            iso_code: "jp".to_string(),
        }
    }

    #[test]
    fn test_begin_recording_clears_state() {
        let mut state = SessionState::new();
        state.transcript = "old".to_string();
        state.anecdotes = vec![entry()];
        state.error = Some("old error".to_string());

        state.begin_recording();

        assert!(state.is_recording());
        assert!(state.transcript.is_empty());
        assert!(state.anecdotes.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_begin_while_recording_is_noop() {
        let mut state = SessionState::new();
        state.begin_recording();
        state.apply(CaptureUpdate::Partial("hello".to_string()));

        state.begin_recording();
        assert_eq!(state.transcript, "hello");
    }

    #[test]
    fn test_partial_replaces_transcript() {
        let mut state = SessionState::new();
        state.begin_recording();

        state.apply(CaptureUpdate::Partial("hello".to_string()));
        state.apply(CaptureUpdate::Partial("hello world".to_string()));

        assert_eq!(state.transcript, "hello world");
    }

    #[test]
    fn test_partial_ignored_while_idle() {
        let mut state = SessionState::new();
        state.apply(CaptureUpdate::Partial("stray".to_string()));
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn test_completed_enters_analyzing() {
        let mut state = SessionState::new();
        state.begin_recording();
        state.apply(CaptureUpdate::Completed("final text".to_string()));

        assert!(!state.is_recording());
        assert!(state.is_loading());
        assert_eq!(state.transcript, "final text");
        assert_eq!(state.status_label(), "Analyzing...");
    }

    #[test]
    fn test_failed_resets_without_anecdotes() {
        let mut state = SessionState::new();
        state.begin_recording();
        state.apply(CaptureUpdate::Failed("network".to_string()));

        assert!(!state.is_recording());
        assert!(!state.is_loading());
        assert!(state.anecdotes.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Error recognizing speech: network")
        );
    }

    #[test]
    fn test_finish_clears_loading() {
        let mut state = SessionState::new();
        state.begin_recording();
        state.apply(CaptureUpdate::Completed("Japan".to_string()));
        state.finish(vec![entry()]);

        assert!(!state.is_loading());
        assert_eq!(state.anecdotes.len(), 1);
        assert_eq!(state.status_label(), "Record Voice");
    }

    #[test]
    fn test_status_labels() {
        let mut state = SessionState::new();
        assert_eq!(state.status_label(), "Record Voice");
        state.begin_recording();
        assert_eq!(state.status_label(), "Stop Recording");
    }

    #[test]
    fn test_select_voice() {
        let mut state = SessionState::new();
        state.select_voice("alloy");
        assert_eq!(state.selected_voice.as_deref(), Some("alloy"));
    }
}
