//! Narration of matched anecdotes
//!
//! Builds one combined utterance for all matched countries and speaks
//! it as a detached task. Playback completion is never awaited;
//! overlapping utterances from rapid re-recording are accepted.

use crate::anecdotes::DisplayAnecdote;
use crate::voice::{AudioPlayback, TextToSpeech, VoiceInfo, resolve_voice};

/// Build the combined narration text for the matched entries
///
/// One sentence per entry, in input order, joined with ". " and
/// carrying a single terminal period. A period already ending an
/// anecdote is not doubled.
#[must_use]
pub fn narration_text(entries: &[DisplayAnecdote]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let sentences: Vec<String> = entries
        .iter()
        .map(|entry| {
            let mut sentence = format!(
                "An interesting fact about {}, the capital of {}, is that {}",
                entry.capital, entry.country, entry.anecdote
            );
            if sentence.ends_with('.') {
                sentence.pop();
            }
            sentence
        })
        .collect();

    format!("{}.", sentences.join(". "))
}

/// Speaks matched anecdotes through the configured TTS provider
pub struct Narrator {
    tts: TextToSpeech,
    voices: Vec<VoiceInfo>,
}

impl Narrator {
    /// Create a narrator over the discovered voices
    #[must_use]
    pub const fn new(tts: TextToSpeech, voices: Vec<VoiceInfo>) -> Self {
        Self { tts, voices }
    }

    /// Speak the matched entries with the selected voice
    ///
    /// Fire-and-forget: synthesis and playback run detached and their
    /// errors are logged, never surfaced. An unknown or absent voice
    /// id falls back to the provider default. Empty entries produce
    /// no utterance.
    pub fn speak(&self, entries: &[DisplayAnecdote], voice_id: Option<&str>) {
        if entries.is_empty() {
            return;
        }

        let text = narration_text(entries);
        let voice = voice_id
            .and_then(|id| resolve_voice(&self.voices, id))
            .cloned();
        let tts = self.tts.clone();

        tracing::debug!(
            chars = text.len(),
            voice = voice.as_ref().map_or("default", |v| v.name.as_str()),
            "starting narration"
        );

        tokio::spawn(async move {
            let audio = match tts.synthesize(&text, voice.as_ref()).await {
                Ok(audio) => audio,
                Err(e) => {
                    tracing::warn!(error = %e, "narration synthesis failed");
                    return;
                }
            };

            // cpal streams are not Send; play on a blocking thread
            let played = tokio::task::spawn_blocking(move || {
                AudioPlayback::new().and_then(|playback| playback.play_mp3(&audio))
            })
            .await;

            match played {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "narration playback failed"),
                Err(e) => tracing::warn!(error = %e, "narration playback task failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(country: &str, capital: &str, anecdote: &str) -> DisplayAnecdote {
        DisplayAnecdote {
            country: country.to_string(),
            capital: capital.to_string(),
            anecdote: anecdote.to_string(),
            iso_code: "xx".to_string(),
        }
    }

    #[test]
    fn test_single_entry_exact() {
        let text = narration_text(&[entry("Japan", "Tokyo", "X")]);
        assert_eq!(
            text,
            "An interesting fact about Tokyo, the capital of Japan, is that X."
        );
    }

    #[test]
    fn test_trailing_period_not_doubled() {
        let text = narration_text(&[entry("Japan", "Tokyo", "X.")]);
        assert_eq!(
            text,
            "An interesting fact about Tokyo, the capital of Japan, is that X."
        );
    }

    #[test]
    fn test_two_entries_joined() {
        let text = narration_text(&[entry("Germany", "Berlin", "A."), entry("Japan", "Tokyo", "B")]);
        assert_eq!(
            text,
            "An interesting fact about Berlin, the capital of Germany, is that A. \
             An interesting fact about Tokyo, the capital of Japan, is that B."
        );
    }

    #[test]
    fn test_empty_entries() {
        assert!(narration_text(&[]).is_empty());
    }
}
