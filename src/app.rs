//! Interactive record loop
//!
//! The terminal surface for the demo: one control to start/stop
//! capture, a voice selector, the live transcript, and the matched
//! anecdote list. The loop owns the session state and is its only
//! writer; cpal streams stay on this task (they are not `Send`).

use std::time::Duration;

use dialoguer::{Confirm, Select};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::Result;
use crate::anecdotes::flag_url;
use crate::config::Config;
use crate::narration::Narrator;
use crate::pipeline;
use crate::session::{CaptureUpdate, SessionState};
use crate::voice::{
    AudioCapture, SAMPLE_RATE, SegmentEvent, SpeechToText, TextToSpeech, UtteranceSegmenter,
    VoiceCatalog, default_voice, english_voices, resolve_voice, samples_to_wav,
};

/// Audio poll interval (matches the capture chunk cadence)
const TICK: Duration = Duration::from_millis(100);

/// The interactive application
pub struct App {
    config: Config,
    state: SessionState,
    narrator: Option<Narrator>,
}

impl App {
    /// Create the app from loaded configuration
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: SessionState::new(),
            narrator: None,
        }
    }

    /// Run the interactive loop until the user quits
    ///
    /// # Errors
    ///
    /// Returns error only on unrecoverable IO failures; recognition
    /// and synthesis errors degrade to a retriable idle state.
    #[allow(clippy::future_not_send)]
    pub async fn run(mut self) -> Result<()> {
        println!("Atlas — country anecdotes by voice\n");

        self.discover_voices().await;
        self.prompt_voice_selection();

        // One reader task feeds all line-based input: the start
        // prompt and the stop control during capture.
        let (line_tx, mut lines) = mpsc::channel::<String>(4);
        tokio::spawn(async move {
            let mut reader = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if line_tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        loop {
            println!("\n[{}] Press Enter to start recording.", self.state.status_label());
            if lines.recv().await.is_none() {
                break;
            }

            self.record_once(&mut lines).await;
            self.render_results();

            let again = Confirm::new()
                .with_prompt("Record again?")
                .default(true)
                .interact()
                .unwrap_or(false);
            if !again {
                break;
            }
        }

        Ok(())
    }

    /// Discover voices and pick the initial selection
    async fn discover_voices(&mut self) {
        let catalog = VoiceCatalog::from_config(&self.config);
        if !catalog.has_synthesis() {
            tracing::info!("no TTS provider configured, narration disabled");
            return;
        }

        println!("Loading voices...");
        let voices = catalog.discover().await;

        let configured = self.config.voice.tts_voice.as_deref();
        let initial = configured
            .and_then(|id| resolve_voice(&voices, id))
            .or_else(|| default_voice(&voices));
        if let Some(voice) = initial {
            self.state.select_voice(voice.id.clone());
        }

        self.narrator =
            TextToSpeech::from_config(&self.config).map(|tts| Narrator::new(tts, voices.clone()));
        self.state.voices = voices;
    }

    /// Offer the voice selection control over the English voices
    fn prompt_voice_selection(&mut self) {
        let english = english_voices(&self.state.voices);
        if english.is_empty() {
            return;
        }

        let labels: Vec<String> = english
            .iter()
            .map(|v| format!("{} ({}) [{}]", v.name, v.language, v.provider))
            .collect();
        let default_idx = english
            .iter()
            .position(|v| Some(v.id.as_str()) == self.state.selected_voice.as_deref())
            .unwrap_or(0);

        let Ok(idx) = Select::new()
            .with_prompt("Choose a voice")
            .items(&labels)
            .default(default_idx)
            .interact()
        else {
            // Prompt aborted; keep the default selection
            return;
        };

        self.state.select_voice(english[idx].id.clone());
    }

    /// Run one recording cycle: capture → transcribe → detect → narrate
    #[allow(clippy::future_not_send)]
    async fn record_once(&mut self, lines: &mut mpsc::Receiver<String>) {
        self.state.begin_recording();

        let stt = match SpeechToText::from_config(&self.config) {
            Ok(stt) => stt,
            Err(e) => {
                self.state.fail_unsupported(&e.to_string());
                return;
            }
        };

        let mut capture = match AudioCapture::new() {
            Ok(capture) => capture,
            Err(e) => {
                self.state.fail_unsupported(&e.to_string());
                return;
            }
        };
        if let Err(e) = capture.start() {
            self.state.fail_unsupported(&e.to_string());
            return;
        }

        println!("Recording... speak now, press Enter to stop. [{}]", self.state.status_label());

        let mut segmenter = UtteranceSegmenter::new();
        let mut segments: Vec<String> = Vec::new();

        loop {
            tokio::select! {
                line = lines.recv() => {
                    if line.is_none() {
                        tracing::debug!("stdin closed, stopping capture");
                    }
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    // Same completion path as an explicit stop
                    break;
                }
                () = tokio::time::sleep(TICK) => {
                    let samples = capture.take_buffer();
                    match segmenter.push(&samples) {
                        Some(SegmentEvent::Segment(segment)) => {
                            match transcribe_segment(&stt, &segment).await {
                                Ok(Some(text)) => {
                                    segments.push(text);
                                    let joined = segments.join(" ");
                                    println!("  » {joined}");
                                    self.state.apply(CaptureUpdate::Partial(joined));
                                }
                                Ok(None) => {}
                                Err(e) => {
                                    capture.stop();
                                    self.state.apply(CaptureUpdate::Failed(e.to_string()));
                                    return;
                                }
                            }
                        }
                        Some(SegmentEvent::SessionEnd) => {
                            tracing::debug!("natural end of speech");
                            break;
                        }
                        None => {}
                    }
                }
            }
        }

        capture.stop();

        // Speech cut off mid-segment still counts toward the final
        // transcript.
        let trailing = segmenter.flush();
        if trailing.len() > SAMPLE_RATE as usize / 2 {
            match transcribe_segment(&stt, &trailing).await {
                Ok(Some(text)) => segments.push(text),
                Ok(None) => {}
                Err(e) => {
                    self.state.apply(CaptureUpdate::Failed(e.to_string()));
                    return;
                }
            }
        }

        let transcript = segments.join(" ");
        self.state.apply(CaptureUpdate::Completed(transcript.clone()));
        println!("\n{}", self.state.status_label());

        let entries =
            pipeline::process_transcript(&transcript, self.config.voice.processing_delay).await;
        self.state.finish(entries);

        if !self.state.anecdotes.is_empty() {
            if let Some(narrator) = &self.narrator {
                narrator.speak(&self.state.anecdotes, self.state.selected_voice.as_deref());
            }
        }
    }

    /// Render the outcome of the last cycle
    fn render_results(&self) {
        if let Some(error) = &self.state.error {
            println!("\n{error}");
            return;
        }

        if !self.state.transcript.is_empty() {
            println!("\nYour input: {}", self.state.transcript);
        }

        if self.state.anecdotes.is_empty() {
            println!("No countries mentioned.");
            return;
        }

        for anecdote in &self.state.anecdotes {
            println!("\n  {} ({})", anecdote.capital, anecdote.country);
            println!("    flag: {}", flag_url(&anecdote.iso_code));
            println!("    {}", anecdote.anecdote);
        }
    }
}

/// Transcribe one segment, normalizing empty results to `None`
async fn transcribe_segment(stt: &SpeechToText, samples: &[f32]) -> Result<Option<String>> {
    let wav = samples_to_wav(samples, SAMPLE_RATE)?;
    let text = stt.transcribe(&wav).await?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
