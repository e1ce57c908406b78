use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use atlas_voice::voice::{
    AudioCapture, AudioPlayback, SAMPLE_RATE, TextToSpeech, VoiceCatalog, calculate_rms,
    default_voice, resolve_voice,
};
use atlas_voice::{App, Config, flag_url};

/// Atlas - country anecdotes by voice
#[derive(Parser)]
#[command(name = "atlas", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Detect countries in typed text (no audio needed)
    Detect {
        /// Text to scan for country mentions
        text: String,
    },
    /// List available synthesis voices
    ListVoices,
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,atlas_voice=info",
        1 => "info,atlas_voice=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Detect { text } => cmd_detect(&text).await,
            Command::ListVoices => cmd_list_voices().await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&text).await,
            Command::Setup => atlas_voice::setup::run_setup(),
        };
    }

    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    App::new(config).run().await?;
    Ok(())
}

/// Run detection and the table join over typed text
async fn cmd_detect(text: &str) -> anyhow::Result<()> {
    let entries = atlas_voice::pipeline::process_transcript(text, Duration::ZERO).await;

    if entries.is_empty() {
        println!("No countries mentioned.");
        return Ok(());
    }

    for entry in &entries {
        println!("{} ({})", entry.capital, entry.country);
        println!("  flag: {}", flag_url(&entry.iso_code));
        println!("  {}", entry.anecdote);
    }

    Ok(())
}

/// List the discovered synthesis voices
async fn cmd_list_voices() -> anyhow::Result<()> {
    let config = Config::load()?;
    let catalog = VoiceCatalog::from_config(&config);

    if !catalog.has_synthesis() {
        println!("No TTS provider configured (set OPENAI_API_KEY or ELEVENLABS_API_KEY).");
        return Ok(());
    }

    let voices = catalog.discover().await;
    if voices.is_empty() {
        println!("No voices available.");
        return Ok(());
    }

    let default_id = default_voice(&voices).map(|v| v.id.clone());
    for voice in &voices {
        let marker = if Some(&voice.id) == default_id.as_ref() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{} ({}) [{}] id={}{marker}",
            voice.name, voice.language, voice.provider, voice.id
        );
    }

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    println!("Sample rate: {SAMPLE_RATE} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");

    Ok(())
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    // 2 seconds of 440Hz sine at the 24kHz playback rate
    let sample_rate = 24000.0_f32;
    let num_samples = (sample_rate * 2.0) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3
        })
        .collect();

    println!("Playing {} samples...", samples.len());
    playback.play(&samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS synthesis and playback
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let Some(tts) = TextToSpeech::from_config(&config) else {
        anyhow::bail!("no TTS provider configured (set OPENAI_API_KEY or ELEVENLABS_API_KEY)");
    };

    let catalog = VoiceCatalog::from_config(&config);
    let voices = catalog.discover().await;
    let voice = config
        .voice
        .tts_voice
        .as_deref()
        .and_then(|id| resolve_voice(&voices, id))
        .or_else(|| default_voice(&voices));

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text, voice).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let playback = AudioPlayback::new()?;
    tokio::task::spawn_blocking(move || playback.play_mp3(&mp3_data)).await??;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
