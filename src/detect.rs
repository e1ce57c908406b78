//! Country mention detection in transcripts
//!
//! Whole-word, case-insensitive matching of country names and their
//! capitals against the static anecdote table. Result order is table
//! order, not input order.

use std::sync::LazyLock;

use regex::Regex;

use crate::anecdotes::ANECDOTES;

/// One compiled matcher per table entry, in table order
static COUNTRY_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ANECDOTES
        .iter()
        .map(|entry| {
            let pattern = format!(
                "(?i){}|{}",
                word_bounded(entry.country),
                word_bounded(entry.capital)
            );
            (
                entry.country,
                Regex::new(&pattern).expect("valid country pattern"),
            )
        })
        .collect()
});

/// Matcher for the Gaza editorial alias
static GAZA_MATCHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bGaza\b").expect("valid regex"));

/// Escape a name and anchor it on word boundaries
///
/// A boundary is only asserted next to an alphanumeric edge character;
/// `\b` after a terminal period ("Washington, D.C.") would never match.
fn word_bounded(term: &str) -> String {
    let mut pattern = String::new();
    if term.chars().next().is_some_and(char::is_alphanumeric) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(term));
    if term.chars().last().is_some_and(char::is_alphanumeric) {
        pattern.push_str(r"\b");
    }
    pattern
}

/// Detect all countries mentioned in a transcript
///
/// A country matches when its name or its capital's name occurs as a
/// whole word. The Gaza alias is a fixed special case appended after
/// table matching, not a general alias mechanism.
#[must_use]
pub fn detect_countries(text: &str) -> Vec<String> {
    let mut detected: Vec<String> = COUNTRY_MATCHERS
        .iter()
        .filter(|(_, matcher)| matcher.is_match(text))
        .map(|(country, _)| (*country).to_string())
        .collect();

    if GAZA_MATCHER.is_match(text) && !detected.iter().any(|c| c == "Palestine") {
        detected.push("Palestine".to_string());
    }

    detected
}
