//! Utterance segmentation
//!
//! Splits the microphone stream into speech segments on RMS energy,
//! and signals the natural end of a recognition session after a long
//! trailing silence. This is the local analog of the platform silence
//! detection that ends a continuous dictation session.

/// Minimum audio energy to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum segment length to keep (in samples at 16kHz)
const MIN_SEGMENT_SAMPLES: usize = 4800; // 0.3 seconds

/// Trailing silence that closes a segment (in samples)
const SEGMENT_SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// Idle silence after speech that ends the session (in samples)
const SESSION_SILENCE_SAMPLES: usize = 40000; // 2.5 seconds

/// State of the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Waiting for speech
    Idle,
    /// Inside a speech segment
    Speech,
}

/// Event produced by feeding audio to the segmenter
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEvent {
    /// A speech segment completed; carries its samples
    Segment(Vec<f32>),
    /// Long silence after speech; the session has ended naturally
    SessionEnd,
}

/// Segments a capture stream into utterances
pub struct UtteranceSegmenter {
    state: SegmenterState,
    segment: Vec<f32>,
    silence_run: usize,
    idle_silence_run: usize,
    segments_seen: usize,
    ended: bool,
}

impl Default for UtteranceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceSegmenter {
    /// Create a new segmenter in the idle state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SegmenterState::Idle,
            segment: Vec::new(),
            silence_run: 0,
            idle_silence_run: 0,
            segments_seen: 0,
            ended: false,
        }
    }

    /// Feed captured samples, returning at most one event
    pub fn push(&mut self, samples: &[f32]) -> Option<SegmentEvent> {
        if self.ended || samples.is_empty() {
            return None;
        }

        let energy = calculate_rms(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            SegmenterState::Idle => {
                if is_speech {
                    tracing::trace!(energy, "speech started");
                    self.state = SegmenterState::Speech;
                    self.segment.clear();
                    self.segment.extend_from_slice(samples);
                    self.silence_run = 0;
                    self.idle_silence_run = 0;
                } else if self.segments_seen > 0 {
                    self.idle_silence_run += samples.len();
                    if self.idle_silence_run > SESSION_SILENCE_SAMPLES {
                        tracing::debug!(segments = self.segments_seen, "session ended on silence");
                        self.ended = true;
                        return Some(SegmentEvent::SessionEnd);
                    }
                }
            }
            SegmenterState::Speech => {
                self.segment.extend_from_slice(samples);

                if is_speech {
                    self.silence_run = 0;
                } else {
                    self.silence_run += samples.len();
                }

                if self.silence_run > SEGMENT_SILENCE_SAMPLES {
                    let trailing = self.silence_run;
                    self.state = SegmenterState::Idle;
                    self.idle_silence_run = trailing;
                    self.silence_run = 0;

                    // The buffer carries its trailing silence; gate on
                    // the speech portion only.
                    let segment = std::mem::take(&mut self.segment);
                    if segment.len().saturating_sub(trailing) > MIN_SEGMENT_SAMPLES {
                        tracing::debug!(samples = segment.len(), "segment complete");
                        self.segments_seen += 1;
                        return Some(SegmentEvent::Segment(segment));
                    }
                    tracing::trace!(samples = segment.len(), "segment too short, dropped");
                }
            }
        }

        None
    }

    /// Take any in-progress segment samples
    ///
    /// Used on explicit stop so speech cut off mid-segment still
    /// contributes to the final transcript.
    pub fn flush(&mut self) -> Vec<f32> {
        self.state = SegmenterState::Idle;
        self.silence_run = 0;
        std::mem::take(&mut self.segment)
    }

    /// Number of completed segments so far
    #[must_use]
    pub const fn segments_seen(&self) -> usize {
        self.segments_seen
    }

    /// Whether the session has ended naturally
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SegmenterState {
        self.state
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(duration_secs: f32, amplitude: f32) -> Vec<f32> {
        let num_samples = (16000.0 * duration_secs) as usize;
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / 16000.0;
                amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect()
    }

    fn silence(duration_secs: f32) -> Vec<f32> {
        vec![0.0; (16000.0 * duration_secs) as usize]
    }

    #[test]
    fn test_silence_never_opens_segment() {
        let mut segmenter = UtteranceSegmenter::new();
        assert_eq!(segmenter.push(&silence(1.0)), None);
        assert_eq!(segmenter.state(), SegmenterState::Idle);
    }

    #[test]
    fn test_speech_then_silence_closes_segment() {
        let mut segmenter = UtteranceSegmenter::new();
        let speech = sine(0.5, 0.3);
        assert_eq!(segmenter.push(&speech), None);
        assert_eq!(segmenter.state(), SegmenterState::Speech);

        match segmenter.push(&silence(0.6)) {
            Some(SegmentEvent::Segment(samples)) => {
                assert!(samples.len() >= speech.len());
            }
            other => panic!("expected segment, got {other:?}"),
        }
        assert_eq!(segmenter.segments_seen(), 1);
    }

    #[test]
    fn test_session_ends_after_segment_and_long_silence() {
        let mut segmenter = UtteranceSegmenter::new();
        segmenter.push(&sine(0.5, 0.3));
        segmenter.push(&silence(0.6));
        assert_eq!(segmenter.segments_seen(), 1);

        assert_eq!(segmenter.push(&silence(2.5)), Some(SegmentEvent::SessionEnd));
        assert!(segmenter.is_ended());

        // Terminal: further audio is ignored
        assert_eq!(segmenter.push(&sine(0.5, 0.3)), None);
    }

    #[test]
    fn test_no_session_end_without_speech() {
        let mut segmenter = UtteranceSegmenter::new();
        assert_eq!(segmenter.push(&silence(10.0)), None);
        assert!(!segmenter.is_ended());
    }

    #[test]
    fn test_short_blip_dropped() {
        let mut segmenter = UtteranceSegmenter::new();
        segmenter.push(&sine(0.1, 0.3));
        assert_eq!(segmenter.push(&silence(0.6)), None);
        assert_eq!(segmenter.segments_seen(), 0);
    }

    #[test]
    fn test_flush_returns_in_progress_samples() {
        let mut segmenter = UtteranceSegmenter::new();
        let speech = sine(0.4, 0.3);
        segmenter.push(&speech);

        let flushed = segmenter.flush();
        assert_eq!(flushed.len(), speech.len());
        assert_eq!(segmenter.state(), SegmenterState::Idle);
        assert!(segmenter.flush().is_empty());
    }

    #[test]
    fn test_rms_energy() {
        assert!(calculate_rms(&vec![0.0f32; 100]) < 0.001);
        assert!(calculate_rms(&vec![0.5f32; 100]) > 0.4);
        assert!(calculate_rms(&[]) < f32::EPSILON);
    }
}
