//! Synthesis voice discovery
//!
//! The available voice list is the union of the configured TTS
//! providers' catalogs. OpenAI ships a fixed voice set; ElevenLabs
//! voices are enumerated over HTTP and may not be available
//! immediately, so discovery re-polls until at least one voice is
//! known (bounded).

use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::{Error, Result};

/// Provider tag for OpenAI voices
pub const PROVIDER_OPENAI: &str = "openai";

/// Provider tag for ElevenLabs voices
pub const PROVIDER_ELEVENLABS: &str = "elevenlabs";

/// Provider preferred when choosing the initial default voice
const PREFERRED_PROVIDER: &str = PROVIDER_ELEVENLABS;

/// Voices shipped with the OpenAI speech endpoint
const OPENAI_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Discovery retry attempts before giving up
const DISCOVERY_ATTEMPTS: u32 = 3;

/// Delay between discovery retries
const DISCOVERY_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A synthesis voice descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Provider-scoped voice identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// BCP-47-ish language tag (e.g. "en")
    pub language: String,
    /// Which provider owns this voice
    pub provider: String,
}

/// ElevenLabs voice list response
#[derive(serde::Deserialize)]
struct ElevenLabsVoices {
    voices: Vec<ElevenLabsVoice>,
}

#[derive(serde::Deserialize)]
struct ElevenLabsVoice {
    voice_id: String,
    name: String,
    #[serde(default)]
    labels: HashMap<String, String>,
}

/// Enumerates available synthesis voices
pub struct VoiceCatalog {
    client: reqwest::Client,
    openai_enabled: bool,
    elevenlabs_key: Option<String>,
}

impl VoiceCatalog {
    /// Build a catalog over the providers configured with keys
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            openai_enabled: config.api_keys.openai.is_some(),
            elevenlabs_key: config.api_keys.elevenlabs.clone(),
        }
    }

    /// Whether any synthesis provider is configured
    #[must_use]
    pub const fn has_synthesis(&self) -> bool {
        self.openai_enabled || self.elevenlabs_key.is_some()
    }

    /// Discover available voices, retrying until at least one is known
    ///
    /// Returns an empty list only when no provider yields a voice
    /// within the retry budget; narration is then skipped upstream.
    pub async fn discover(&self) -> Vec<VoiceInfo> {
        if !self.has_synthesis() {
            return Vec::new();
        }

        let mut voices = Vec::new();

        for attempt in 1..=DISCOVERY_ATTEMPTS {
            voices.clear();

            if self.openai_enabled {
                voices.extend(openai_voices());
            }

            if self.elevenlabs_key.is_some() {
                match self.fetch_elevenlabs_voices().await {
                    Ok(fetched) => voices.extend(fetched),
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "ElevenLabs voice listing failed");
                    }
                }
            }

            if !voices.is_empty() {
                break;
            }
            if attempt < DISCOVERY_ATTEMPTS {
                tokio::time::sleep(DISCOVERY_RETRY_DELAY).await;
            }
        }

        tracing::debug!(count = voices.len(), "voice discovery complete");
        voices
    }

    /// List ElevenLabs voices
    async fn fetch_elevenlabs_voices(&self) -> Result<Vec<VoiceInfo>> {
        let Some(api_key) = self.elevenlabs_key.as_deref() else {
            return Ok(Vec::new());
        };

        let response = self
            .client
            .get("https://api.elevenlabs.io/v1/voices")
            .header("xi-api-key", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!(
                "ElevenLabs voices error {status}: {body}"
            )));
        }

        let listing: ElevenLabsVoices = response.json().await?;

        Ok(listing
            .voices
            .into_iter()
            .map(|v| {
                // Stock voices carry no explicit language label; they
                // are English.
                let language = v
                    .labels
                    .get("language")
                    .cloned()
                    .unwrap_or_else(|| "en".to_string());
                VoiceInfo {
                    id: v.voice_id,
                    name: v.name,
                    language,
                    provider: PROVIDER_ELEVENLABS.to_string(),
                }
            })
            .collect())
    }
}

/// The fixed OpenAI voice set
fn openai_voices() -> Vec<VoiceInfo> {
    OPENAI_VOICES
        .iter()
        .map(|name| VoiceInfo {
            id: (*name).to_string(),
            name: (*name).to_string(),
            language: "en".to_string(),
            provider: PROVIDER_OPENAI.to_string(),
        })
        .collect()
}

/// Pick the initial default voice
///
/// Preference order: first English voice from the preferred provider,
/// else first English voice, else first voice.
#[must_use]
pub fn default_voice(voices: &[VoiceInfo]) -> Option<&VoiceInfo> {
    voices
        .iter()
        .find(|v| v.language.starts_with("en") && v.provider == PREFERRED_PROVIDER)
        .or_else(|| voices.iter().find(|v| v.language.starts_with("en")))
        .or_else(|| voices.first())
}

/// Resolve a voice identifier against the discovered list
#[must_use]
pub fn resolve_voice<'a>(voices: &'a [VoiceInfo], voice_id: &str) -> Option<&'a VoiceInfo> {
    voices.iter().find(|v| v.id == voice_id)
}

/// Voices suitable for the selection control (English only)
#[must_use]
pub fn english_voices(voices: &[VoiceInfo]) -> Vec<&VoiceInfo> {
    voices
        .iter()
        .filter(|v| v.language.starts_with("en"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str, language: &str, provider: &str) -> VoiceInfo {
        VoiceInfo {
            id: id.to_string(),
            name: id.to_string(),
            language: language.to_string(),
            provider: provider.to_string(),
        }
    }

    #[test]
    fn test_default_prefers_preferred_provider_english() {
        let voices = vec![
            voice("alloy", "en", PROVIDER_OPENAI),
            voice("rachel", "en", PROVIDER_ELEVENLABS),
        ];
        assert_eq!(default_voice(&voices).unwrap().id, "rachel");
    }

    #[test]
    fn test_default_falls_back_to_first_english() {
        let voices = vec![
            voice("antoine", "fr", PROVIDER_ELEVENLABS),
            voice("alloy", "en", PROVIDER_OPENAI),
        ];
        assert_eq!(default_voice(&voices).unwrap().id, "alloy");
    }

    #[test]
    fn test_default_falls_back_to_first_voice() {
        let voices = vec![
            voice("antoine", "fr", PROVIDER_ELEVENLABS),
            voice("mizuki", "ja", PROVIDER_ELEVENLABS),
        ];
        assert_eq!(default_voice(&voices).unwrap().id, "antoine");
    }

    #[test]
    fn test_default_none_when_empty() {
        assert!(default_voice(&[]).is_none());
    }

    #[test]
    fn test_resolve_voice() {
        let voices = vec![voice("alloy", "en", PROVIDER_OPENAI)];
        assert!(resolve_voice(&voices, "alloy").is_some());
        assert!(resolve_voice(&voices, "nova").is_none());
    }

    #[test]
    fn test_english_filter_matches_regional_tags() {
        let voices = vec![
            voice("gb", "en-GB", PROVIDER_ELEVENLABS),
            voice("fr", "fr", PROVIDER_ELEVENLABS),
        ];
        let english = english_voices(&voices);
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].id, "gb");
    }
}
