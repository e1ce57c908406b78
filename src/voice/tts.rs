//! Text-to-speech (TTS) processing
//!
//! Synthesis routes each voice to the provider that owns it; when no
//! voice is resolved, the first configured provider's default voice
//! is used rather than failing.

use crate::config::Config;
use crate::voice::voices::{PROVIDER_ELEVENLABS, PROVIDER_OPENAI, VoiceInfo};
use crate::{Error, Result};

/// Default OpenAI speech model
const OPENAI_TTS_MODEL: &str = "tts-1";

/// Default OpenAI voice when none is resolved
const OPENAI_DEFAULT_VOICE: &str = "alloy";

/// Default ElevenLabs model
const ELEVENLABS_MODEL: &str = "eleven_monolingual_v1";

/// Default ElevenLabs voice when none is resolved (stock "Rachel")
const ELEVENLABS_DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";

#[derive(Clone)]
struct OpenAiBackend {
    api_key: String,
    model: String,
    speed: f32,
}

#[derive(Clone)]
struct ElevenLabsBackend {
    api_key: String,
    model: String,
}

/// Synthesizes speech from text
#[derive(Clone)]
pub struct TextToSpeech {
    client: reqwest::Client,
    openai: Option<OpenAiBackend>,
    elevenlabs: Option<ElevenLabsBackend>,
}

impl TextToSpeech {
    /// Create a TTS instance over the configured providers
    ///
    /// Returns `None` when no synthesis provider is configured; the
    /// pipeline then skips narration entirely.
    #[must_use]
    pub fn from_config(config: &Config) -> Option<Self> {
        #[allow(clippy::cast_possible_truncation)]
        let openai = config.api_keys.openai.clone().map(|api_key| OpenAiBackend {
            api_key,
            model: config
                .voice
                .tts_model
                .clone()
                .unwrap_or_else(|| OPENAI_TTS_MODEL.to_string()),
            speed: config.voice.tts_speed as f32,
        });

        let elevenlabs = config
            .api_keys
            .elevenlabs
            .clone()
            .map(|api_key| ElevenLabsBackend {
                api_key,
                model: ELEVENLABS_MODEL.to_string(),
            });

        if openai.is_none() && elevenlabs.is_none() {
            return None;
        }

        Some(Self {
            client: reqwest::Client::new(),
            openai,
            elevenlabs,
        })
    }

    /// Synthesize text to MP3 bytes with the given voice
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails or the voice's provider is
    /// not configured
    pub async fn synthesize(&self, text: &str, voice: Option<&VoiceInfo>) -> Result<Vec<u8>> {
        match voice {
            Some(v) if v.provider == PROVIDER_OPENAI => self.synthesize_openai(text, &v.id).await,
            Some(v) if v.provider == PROVIDER_ELEVENLABS => {
                self.synthesize_elevenlabs(text, &v.id).await
            }
            Some(v) => Err(Error::Tts(format!(
                "no backend configured for provider {}",
                v.provider
            ))),
            // Provider default voice
            None if self.openai.is_some() => {
                self.synthesize_openai(text, OPENAI_DEFAULT_VOICE).await
            }
            None => {
                self.synthesize_elevenlabs(text, ELEVENLABS_DEFAULT_VOICE)
                    .await
            }
        }
    }

    /// Synthesize using OpenAI TTS
    async fn synthesize_openai(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        let backend = self
            .openai
            .as_ref()
            .ok_or_else(|| Error::Tts("OpenAI TTS not configured".to_string()))?;

        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &backend.model,
            input: text,
            voice: voice_id,
            speed: backend.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", backend.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }

    /// Synthesize using ElevenLabs TTS
    async fn synthesize_elevenlabs(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        let backend = self
            .elevenlabs
            .as_ref()
            .ok_or_else(|| Error::Tts("ElevenLabs TTS not configured".to_string()))?;

        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!("https://api.elevenlabs.io/v1/text-to-speech/{voice_id}");

        let request = ElevenLabsRequest {
            text,
            model_id: &backend.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &backend.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}
