//! Prompt analysis
//!
//! Turns a freeform recommendation prompt into a structured
//! [`PromptAnalysis`]. A generative backend is asked first when one is
//! configured; any failure falls back silently to the deterministic keyword
//! extractor.

use crate::error::{AppError, AppResult};
use crate::models::{Message, PromptAnalysis};
use crate::services::chat::extract_json_object;
use crate::services::providers::GenerativeBackend;

const ANALYSIS_SYSTEM_PROMPT: &str = "Suggest ONE movie title based on the prompt and extract keywords. Respond ONLY with valid JSON matching: {\"title\":\"\", \"year\":\"\", \"genre\":\"\", \"mood\":\"\", \"themes\":[\"\"], \"keywords\":[\"\"]}.";

const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Genre vocabulary, scanned in order; first substring match wins
const GENRES: &[&str] = &[
    "action",
    "adventure",
    "animation",
    "comedy",
    "crime",
    "documentary",
    "drama",
    "family",
    "fantasy",
    "history",
    "horror",
    "music",
    "mystery",
    "romance",
    "sci-fi",
    "science fiction",
    "thriller",
    "war",
    "western",
];

/// Mood-adjective vocabulary, scanned in order
const MOODS: &[&str] = &[
    "dark",
    "funny",
    "emotional",
    "inspiring",
    "mind-bending",
    "romantic",
    "suspenseful",
    "hopeful",
    "gritty",
    "heartwarming",
    "uplifting",
    "tense",
];

const STOPWORDS: &[&str] = &[
    "the",
    "and",
    "for",
    "with",
    "that",
    "this",
    "about",
    "like",
    "want",
    "watch",
    "movie",
    "something",
    "feel",
    "looking",
    "into",
    "from",
    "have",
    "would",
    "really",
    "kind",
];

const MAX_THEMES: usize = 4;

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Lowercases and strips everything but alphanumerics, whitespace and hyphens
fn sanitize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect()
}

fn first_vocabulary_match(lower: &str, vocabulary: &[&str]) -> Option<String> {
    vocabulary
        .iter()
        .find(|term| lower.contains(*term))
        .or_else(|| {
            vocabulary
                .iter()
                .find(|term| lower.contains(&term.replace('-', " ")))
        })
        .map(|term| term.to_string())
}

/// Significant search terms of a prompt: sanitized tokens longer than 3
/// characters that are not stop words, capped at 4
pub fn search_terms(prompt: &str) -> Vec<String> {
    sanitize(prompt)
        .split_whitespace()
        .filter(|word| word.len() > 3 && !is_stopword(word))
        .take(4)
        .map(str::to_string)
        .collect()
}

/// Deterministic keyword extraction
pub fn extract_keywords(prompt: &str) -> PromptAnalysis {
    let lower = sanitize(prompt);
    let genre = first_vocabulary_match(&lower, GENRES);
    let mood = first_vocabulary_match(&lower, MOODS);

    let themes: Vec<String> = lower
        .split_whitespace()
        .filter(|word| word.len() > 4 && !is_stopword(word))
        .take(MAX_THEMES)
        .map(str::to_string)
        .collect();

    let keywords: Vec<String> = genre
        .iter()
        .chain(mood.iter())
        .chain(themes.iter())
        .cloned()
        .collect();

    PromptAnalysis {
        title: None,
        year: None,
        genre,
        mood,
        themes,
        keywords,
    }
}

fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    let field = value.get(key)?;
    let text = match field {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn string_list(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

async fn generative_analysis(
    backend: &dyn GenerativeBackend,
    prompt: &str,
) -> AppResult<PromptAnalysis> {
    let content = backend
        .generate(
            ANALYSIS_SYSTEM_PROMPT,
            &[Message::user(prompt)],
            ANALYSIS_TEMPERATURE,
        )
        .await?;
    let value = extract_json_object(&content).ok_or_else(|| {
        AppError::Upstream("analysis backend returned unparsable JSON".to_string())
    })?;

    Ok(PromptAnalysis {
        title: string_field(&value, "title"),
        year: string_field(&value, "year"),
        genre: string_field(&value, "genre"),
        mood: string_field(&value, "mood"),
        themes: string_list(&value, "themes"),
        keywords: string_list(&value, "keywords"),
    })
}

/// Analyzes a recommendation prompt
///
/// Never fails: generative errors are logged and the deterministic extractor
/// takes over.
pub async fn analyze(backend: Option<&dyn GenerativeBackend>, prompt: &str) -> PromptAnalysis {
    if let Some(backend) = backend {
        match generative_analysis(backend, prompt).await {
            Ok(analysis) => return analysis,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    backend = backend.name(),
                    "prompt analysis failed, using keyword extractor"
                );
            }
        }
    }
    extract_keywords(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_genre_and_mood_first_match() {
        let analysis = extract_keywords("a dark crime thriller about a detective");
        assert_eq!(analysis.genre.as_deref(), Some("crime"));
        assert_eq!(analysis.mood.as_deref(), Some("dark"));
    }

    #[test]
    fn test_hyphen_folding_second_pass() {
        let analysis = extract_keywords("some mind bending science fiction");
        assert_eq!(analysis.genre.as_deref(), Some("science fiction"));
        assert_eq!(analysis.mood.as_deref(), Some("mind-bending"));
    }

    #[test]
    fn test_themes_skip_stopwords_and_short_tokens() {
        let analysis = extract_keywords("Give me a cozy feel-good movie about friendship.");
        assert_eq!(analysis.genre, None);
        assert_eq!(analysis.mood, None);
        assert_eq!(analysis.themes, vec!["feel-good", "friendship"]);
        assert_eq!(analysis.keywords, vec!["feel-good", "friendship"]);
    }

    #[test]
    fn test_themes_capped_at_four() {
        let analysis =
            extract_keywords("wizards dragons castles knights quests prophecies");
        assert_eq!(analysis.themes.len(), 4);
        assert_eq!(
            analysis.themes,
            vec!["wizards", "dragons", "castles", "knights"]
        );
    }

    #[test]
    fn test_keywords_order_genre_mood_themes() {
        let analysis = extract_keywords("an uplifting comedy about cooking together");
        assert_eq!(analysis.genre.as_deref(), Some("comedy"));
        assert_eq!(analysis.mood.as_deref(), Some("uplifting"));
        assert_eq!(analysis.keywords[0], "comedy");
        assert_eq!(analysis.keywords[1], "uplifting");
        assert!(analysis.keywords[2..].contains(&"cooking".to_string()));
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(
            search_terms("I want to watch a space heist movie"),
            vec!["space", "heist"]
        );
        // Capped at four
        assert_eq!(
            search_terms("pirates wizards robots dinosaurs vikings"),
            vec!["pirates", "wizards", "robots", "dinosaurs"]
        );
        assert!(search_terms("the and for").is_empty());
    }

    #[test]
    fn test_empty_prompt() {
        let analysis = extract_keywords("");
        assert_eq!(analysis, PromptAnalysis::default());
    }
}
