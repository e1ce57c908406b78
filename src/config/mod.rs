//! Configuration management for Atlas voice

pub mod file;

use std::time::Duration;

use crate::Result;
use crate::pipeline::DEFAULT_PROCESSING_DELAY;

/// Recognition language when none is configured
const DEFAULT_LANGUAGE: &str = "en";

/// Atlas voice configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Recognition language, fixed for the whole session
    pub language: String,

    /// STT model override (provider default when unset)
    pub stt_model: Option<String>,

    /// TTS model override (provider default when unset)
    pub tts_model: Option<String>,

    /// Initially selected TTS voice identifier
    pub tts_voice: Option<String>,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Pause between capture completion and transcript processing
    pub processing_delay: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            stt_model: None,
            tts_model: None,
            tts_voice: None,
            tts_speed: 1.0,
            processing_delay: DEFAULT_PROCESSING_DELAY,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper STT and TTS)
    pub openai: Option<String>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,
}

impl Config {
    /// Load configuration, merging env > TOML file > defaults
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for config sources that
    /// can reject (the result type matches call sites that already
    /// propagate).
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();

        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY").ok().or(fc.api_keys.openai),
            deepgram: std::env::var("DEEPGRAM_API_KEY")
                .ok()
                .or(fc.api_keys.deepgram),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .or(fc.api_keys.elevenlabs),
        };

        let defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            language: std::env::var("ATLAS_LANGUAGE")
                .ok()
                .or(fc.voice.language)
                .unwrap_or(defaults.language),
            stt_model: std::env::var("ATLAS_STT_MODEL").ok().or(fc.voice.stt_model),
            tts_model: std::env::var("ATLAS_TTS_MODEL").ok().or(fc.voice.tts_model),
            tts_voice: std::env::var("ATLAS_TTS_VOICE").ok().or(fc.voice.tts_voice),
            tts_speed: std::env::var("ATLAS_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.tts_speed)
                .unwrap_or(defaults.tts_speed),
            processing_delay: std::env::var("ATLAS_PROCESSING_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.processing_delay_ms)
                .map_or(defaults.processing_delay, Duration::from_millis),
        };

        Ok(Self { voice, api_keys })
    }

    /// Whether any STT provider is configured
    #[must_use]
    pub const fn has_recognition(&self) -> bool {
        self.api_keys.openai.is_some() || self.api_keys.deepgram.is_some()
    }

    /// Whether any TTS provider is configured
    #[must_use]
    pub const fn has_synthesis(&self) -> bool {
        self.api_keys.openai.is_some() || self.api_keys.elevenlabs.is_some()
    }
}
