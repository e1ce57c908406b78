//! Detection and processing pipeline integration tests
//!
//! Covers the transcript → detection → table join → narration text
//! path and the session state transitions around it, all without
//! audio hardware or network access.

use std::time::Duration;

use atlas_voice::{
    ANECDOTES, CaptureUpdate, SessionState, detect_countries, narration_text,
    pipeline::process_transcript,
};

#[tokio::test]
async fn test_end_to_end_capital_mentions() {
    let entries = process_transcript("I visited Berlin and then Moscow", Duration::ZERO).await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].country, "Germany");
    assert_eq!(entries[0].capital, "Berlin");
    assert_eq!(entries[0].iso_code, "de");
    assert_eq!(entries[1].country, "Russia");
    assert_eq!(entries[1].capital, "Moscow");
    assert_eq!(entries[1].iso_code, "ru");
}

#[tokio::test]
async fn test_end_to_end_narration_text() {
    let entries = process_transcript("Tell me about Japan", Duration::ZERO).await;

    assert_eq!(entries.len(), 1);
    assert_eq!(
        narration_text(&entries),
        "An interesting fact about Tokyo, the capital of Japan, is that Tokyo is the world's \
         most populous metropolitan area."
    );
}

#[tokio::test]
async fn test_gaza_alias_through_pipeline() {
    let entries = process_transcript("the situation in Gaza", Duration::ZERO).await;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].country, "Palestine");
    assert_eq!(entries[0].capital, "Ramallah");
    assert_eq!(entries[0].iso_code, "ps");
}

#[tokio::test]
async fn test_no_match_yields_empty_display() {
    let entries = process_transcript("the weather is nice today", Duration::ZERO).await;
    assert!(entries.is_empty());
}

#[test]
fn test_detect_never_invents_countries() {
    let texts = [
        "",
        "Berlin Moscow London",
        "Gaza and Palestine and GERMANY",
        "An Englishman in Ouagadougou",
    ];

    for text in texts {
        let detected = detect_countries(text);

        // No duplicates
        let mut unique = detected.clone();
        unique.dedup();
        assert_eq!(detected, unique, "duplicates for {text:?}");

        // Only table countries
        for country in &detected {
            assert!(
                ANECDOTES.iter().any(|e| e.country == *country),
                "unknown country {country} for {text:?}"
            );
        }
    }
}

#[test]
fn test_detect_order_is_table_order() {
    let detected = detect_countries("Samoa then Germany then Bhutan");
    assert_eq!(detected, vec!["Germany", "Bhutan", "Samoa"]);
}

#[test]
fn test_recording_cycle_state() {
    let mut state = SessionState::new();

    state.begin_recording();
    assert_eq!(state.status_label(), "Stop Recording");

    state.apply(CaptureUpdate::Partial("I visited".to_string()));
    state.apply(CaptureUpdate::Partial("I visited Berlin".to_string()));
    assert_eq!(state.transcript, "I visited Berlin");

    state.apply(CaptureUpdate::Completed("I visited Berlin".to_string()));
    assert_eq!(state.status_label(), "Analyzing...");

    let entries = tokio_test::block_on(process_transcript(&state.transcript, Duration::ZERO));
    state.finish(entries);

    assert_eq!(state.status_label(), "Record Voice");
    assert_eq!(state.anecdotes.len(), 1);
    assert_eq!(state.anecdotes[0].country, "Germany");
}

#[test]
fn test_new_recording_clears_previous_cycle() {
    let mut state = SessionState::new();

    state.begin_recording();
    state.apply(CaptureUpdate::Completed("Japan".to_string()));
    state.finish(tokio_test::block_on(process_transcript(
        "Japan",
        Duration::ZERO,
    )));
    assert!(!state.anecdotes.is_empty());

    state.begin_recording();
    assert!(state.transcript.is_empty());
    assert!(state.anecdotes.is_empty());
    assert!(state.error.is_none());
}

#[test]
fn test_recognition_error_skips_processing() {
    let mut state = SessionState::new();

    state.begin_recording();
    state.apply(CaptureUpdate::Partial("I visited Berlin".to_string()));
    state.apply(CaptureUpdate::Failed("network".to_string()));

    // The error path never runs detection, so anecdotes stay empty
    assert!(state.anecdotes.is_empty());
    assert!(!state.is_loading());
    assert_eq!(
        state.error.as_deref(),
        Some("Error recognizing speech: network")
    );
}
