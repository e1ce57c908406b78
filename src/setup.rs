//! Interactive first-run setup wizard (`atlas setup`)

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::config::file::{ApiKeysFileConfig, AtlasConfigFile, VoiceFileConfig, load_config_file};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Atlas Setup\n");

    let existing = load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/atlas/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. OpenAI key, used for both Whisper STT and TTS
    let openai = prompt_key(
        "OpenAI API key (Whisper STT + TTS, OPENAI_API_KEY)",
        existing.api_keys.openai.as_deref(),
    )?;

    // 2. Optional dedicated providers
    let deepgram = if Confirm::new()
        .with_prompt("Use Deepgram for speech recognition?")
        .default(existing.api_keys.deepgram.is_some())
        .interact()?
    {
        prompt_key("Deepgram API key", existing.api_keys.deepgram.as_deref())?
    } else {
        None
    };

    let elevenlabs = if Confirm::new()
        .with_prompt("Use ElevenLabs voices for narration?")
        .default(existing.api_keys.elevenlabs.is_some())
        .interact()?
    {
        prompt_key("ElevenLabs API key", existing.api_keys.elevenlabs.as_deref())?
    } else {
        None
    };

    // 3. Recognition language
    let language: String = Input::new()
        .with_prompt("Recognition language")
        .default(existing.voice.language.unwrap_or_else(|| "en".to_string()))
        .interact_text()?;

    let config_file = AtlasConfigFile {
        voice: VoiceFileConfig {
            language: Some(language),
            stt_model: existing.voice.stt_model,
            tts_model: existing.voice.tts_model,
            tts_voice: existing.voice.tts_voice,
            tts_speed: existing.voice.tts_speed.or(Some(1.0)),
            processing_delay_ms: existing.voice.processing_delay_ms,
        },
        api_keys: ApiKeysFileConfig {
            openai,
            deepgram,
            elevenlabs,
        },
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `atlas` to start.");

    Ok(())
}

/// Prompt for an API key, keeping the existing value on blank input
fn prompt_key(prompt: &str, existing: Option<&str>) -> anyhow::Result<Option<String>> {
    let masked = existing.map(|k| {
        if k.len() > 8 {
            format!("{}...{}", &k[..4], &k[k.len() - 4..])
        } else {
            "****".to_string()
        }
    });

    let full_prompt = masked.as_ref().map_or_else(
        || prompt.to_string(),
        |m| format!("{prompt} (current: {m}, leave blank to keep)"),
    );

    let input: String = Input::new()
        .with_prompt(&full_prompt)
        .allow_empty(true)
        .interact_text()?;

    if input.is_empty() {
        Ok(existing.map(str::to_string))
    } else {
        Ok(Some(input))
    }
}

/// Serialize and write the config file
fn write_config(path: &PathBuf, config: &AtlasConfigFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, serialize_config(config))?;
    Ok(())
}

/// Serialize config to a readable TOML string
fn serialize_config(config: &AtlasConfigFile) -> String {
    let mut out = String::new();

    // [voice]
    let v = &config.voice;
    out.push_str("[voice]\n");
    if let Some(ref language) = v.language {
        out.push_str(&format!("language = \"{language}\"\n"));
    }
    if let Some(ref m) = v.stt_model {
        out.push_str(&format!("stt_model = \"{m}\"\n"));
    }
    if let Some(ref m) = v.tts_model {
        out.push_str(&format!("tts_model = \"{m}\"\n"));
    }
    if let Some(ref voice) = v.tts_voice {
        out.push_str(&format!("tts_voice = \"{voice}\"\n"));
    }
    if let Some(speed) = v.tts_speed {
        out.push_str(&format!("tts_speed = {speed}\n"));
    }
    if let Some(delay) = v.processing_delay_ms {
        out.push_str(&format!("processing_delay_ms = {delay}\n"));
    }
    out.push('\n');

    // [api_keys]
    let ak = &config.api_keys;
    if ak.openai.is_some() || ak.deepgram.is_some() || ak.elevenlabs.is_some() {
        out.push_str("[api_keys]\n");
        for (key, val) in [
            ("openai", &ak.openai),
            ("deepgram", &ak.deepgram),
            ("elevenlabs", &ak.elevenlabs),
        ] {
            if let Some(v) = val {
                out.push_str(&format!("{key} = \"{v}\"\n"));
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_roundtrip() {
        let config = AtlasConfigFile {
            voice: VoiceFileConfig {
                language: Some("en".to_string()),
                stt_model: None,
                tts_model: Some("tts-1".to_string()),
                tts_voice: Some("alloy".to_string()),
                tts_speed: Some(1.0),
                processing_delay_ms: Some(1500),
            },
            api_keys: ApiKeysFileConfig {
                openai: Some("sk-test".to_string()),
                deepgram: None,
                elevenlabs: None,
            },
        };

        let toml = serialize_config(&config);
        let parsed: AtlasConfigFile = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.voice.language.as_deref(), Some("en"));
        assert_eq!(parsed.voice.tts_voice.as_deref(), Some("alloy"));
        assert_eq!(parsed.voice.processing_delay_ms, Some(1500));
        assert_eq!(parsed.api_keys.openai.as_deref(), Some("sk-test"));
    }
}
