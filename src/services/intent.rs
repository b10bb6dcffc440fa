//! Rule-based intent classification
//!
//! Stateless substring classifiers over lower-cased text. Every table is an
//! ordered static slice and every scan is first-hit: when several categories
//! match, table order decides.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{MoodLabel, Preference};

const MOOD_KEYWORDS: &[(MoodLabel, &[&str])] = &[
    (
        MoodLabel::Sad,
        &[
            "sad",
            "down",
            "lonely",
            "heartbroken",
            "grief",
            "cry",
            "not good",
            "not ok",
            "bad",
            "not so great",
            "broke up",
            "break up",
            "heartbreak",
        ],
    ),
    (
        MoodLabel::Anxious,
        &["anxious", "nervous", "worried", "stress", "overwhelmed"],
    ),
    (MoodLabel::Angry, &["angry", "mad", "frustrated", "irritated"]),
    (MoodLabel::Tired, &["tired", "exhausted", "drained", "burnt"]),
    (MoodLabel::Happy, &["happy", "excited", "joy", "good", "great"]),
];

const PREFER_MATCH: &[&str] = &[
    "match",
    "same",
    "similar",
    "current",
    "mirror",
    "stay",
    "keep",
    "as is",
    "match my mood",
    "based on how i feel",
];

const PREFER_UPLIFT: &[&str] = &[
    "uplift",
    "lift",
    "cheer",
    "cheer me up",
    "improve",
    "better",
    "light",
    "fun",
    "make me feel better",
    "pick me up",
    "brighten",
    "uplifting",
];

const GREETINGS: &[&str] = &["hi", "hello", "hey", "good morning", "good afternoon"];

const SMALL_TALK: &[&str] = &[
    "your name",
    "who are you",
    "what are you",
    "what's your name",
    "whats your name",
    "talk to me",
    "chat",
];

const ANOTHER_REQUESTS: &[&str] = &[
    "another",
    "one more",
    "again",
    "new one",
    "different",
    "another one",
];

/// Self-introduction prefixes, matched first-hit in this order
const INTRO_PREFIXES: &[&str] = &["my name is ", "i am ", "i'm ", "im "];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid year pattern"));

/// First mood category with any matching keyword; table order is the tie-break
pub fn detect_mood(text: &str) -> Option<MoodLabel> {
    let lower = text.to_lowercase();
    MOOD_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(mood, _)| *mood)
}

/// Match phrases are checked before uplift phrases; when both are present,
/// match wins
pub fn detect_preference(text: &str) -> Option<Preference> {
    let lower = text.to_lowercase();
    if PREFER_MATCH.iter().any(|word| lower.contains(word)) {
        return Some(Preference::Match);
    }
    if PREFER_UPLIFT.iter().any(|word| lower.contains(word)) {
        return Some(Preference::Uplift);
    }
    None
}

pub fn detect_greeting(text: &str) -> bool {
    let lower = text.to_lowercase();
    GREETINGS.iter().any(|word| lower.contains(word))
}

pub fn detect_small_talk(text: &str) -> bool {
    let lower = text.to_lowercase();
    SMALL_TALK.iter().any(|phrase| lower.contains(phrase))
}

pub fn detect_another(text: &str) -> bool {
    let lower = text.to_lowercase();
    ANOTHER_REQUESTS.iter().any(|phrase| lower.contains(phrase))
}

pub fn detect_intro(text: &str) -> bool {
    let lower = text.to_lowercase();
    INTRO_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Remainder of the original-case text after the first matching intro
/// prefix, trimmed; empty when no prefix matches
pub fn extract_name(text: &str) -> String {
    let lower = text.to_lowercase();
    for prefix in INTRO_PREFIXES {
        if lower.starts_with(prefix) {
            return text[prefix.len()..].trim().to_string();
        }
    }
    String::new()
}

/// First four-digit year beginning with 19 or 20
pub fn extract_year(text: &str) -> Option<String> {
    YEAR_RE.find(text).map(|m| m.as_str().to_string())
}
