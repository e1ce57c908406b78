//! Atlas Voice - country anecdotes by voice
//!
//! This library provides the core functionality for the Atlas demo:
//! - Microphone capture and utterance segmentation
//! - Speech-to-text and text-to-speech provider adapters
//! - Country mention detection over transcripts
//! - The static anecdote table and narration builder
//!
//! # Architecture
//!
//! ```text
//! microphone ──► capture ──► segmenter ──► STT ──► transcript
//!                                                      │
//!                                                   detector
//!                                                      │
//!                                              anecdote table join
//!                                                      │
//!                                          narration ──► TTS ──► speakers
//! ```

pub mod anecdotes;
pub mod app;
pub mod config;
pub mod detect;
pub mod error;
pub mod narration;
pub mod pipeline;
pub mod session;
pub mod setup;
pub mod voice;

pub use anecdotes::{ANECDOTES, AnecdoteEntry, DisplayAnecdote, flag_url};
pub use app::App;
pub use config::Config;
pub use detect::detect_countries;
pub use error::{Error, Result};
pub use narration::{Narrator, narration_text};
pub use session::{CapturePhase, CaptureUpdate, SessionState};
