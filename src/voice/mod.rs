//! Voice processing module
//!
//! Microphone capture, utterance segmentation, speech-to-text,
//! voice discovery, text-to-speech, and speaker playback.

mod capture;
mod playback;
mod segmenter;
mod stt;
mod tts;
pub mod voices;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioPlayback;
pub use segmenter::{SegmentEvent, SegmenterState, UtteranceSegmenter, calculate_rms};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use voices::{VoiceCatalog, VoiceInfo, default_voice, english_voices, resolve_voice};
