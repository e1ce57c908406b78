//! Post-capture processing
//!
//! Runs after a recognition session completes: a short scheduled
//! pause (masking residual recognizer jitter, purely a UX delay),
//! then country detection over the final transcript and the join
//! against the anecdote table.

use std::time::Duration;

use crate::anecdotes::{self, DisplayAnecdote};
use crate::detect::detect_countries;

/// Default pause before processing the final transcript
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(1500);

/// Detect countries in the transcript and join with the table
///
/// The delay is configurable so tests run it at zero. A matched
/// country with an incomplete table entry is dropped; with the static
/// table this should not occur.
pub async fn process_transcript(transcript: &str, delay: Duration) -> Vec<DisplayAnecdote> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let detected = detect_countries(transcript);
    tracing::debug!(countries = ?detected, "detection complete");

    detected
        .iter()
        .filter_map(|country| anecdotes::lookup(country))
        .filter(|entry| !entry.capital.is_empty() && !entry.anecdote.is_empty())
        .map(DisplayAnecdote::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_and_join() {
        let entries = tokio_test::block_on(process_transcript(
            "I visited Berlin and then Moscow",
            Duration::ZERO,
        ));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].country, "Germany");
        assert_eq!(entries[0].capital, "Berlin");
        assert_eq!(entries[0].iso_code, "de");
        assert_eq!(entries[1].country, "Russia");
        assert_eq!(entries[1].capital, "Moscow");
        assert_eq!(entries[1].iso_code, "ru");
    }

    #[test]
    fn test_empty_transcript() {
        let entries = tokio_test::block_on(process_transcript("", Duration::ZERO));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let entries = tokio_test::block_on(process_transcript(
            "nothing geographic here",
            Duration::ZERO,
        ));
        assert!(entries.is_empty());
    }
}
