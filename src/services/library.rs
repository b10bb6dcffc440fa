//! Curated fallback titles
//!
//! Static tag → titles table consulted when neither the analysis title nor
//! free-text search has produced a movie yet. Entries are ordered; lookup is
//! a linear scan so table order stays meaningful.

use crate::models::PromptAnalysis;

const UPLIFTING: &[&str] = &["The Secret Life of Walter Mitty", "Chef", "Paddington 2"];
const FEEL_GOOD: &[&str] = &["Chef", "Paddington 2", "The Secret Life of Walter Mitty"];
const COMEDY: &[&str] = &["Game Night", "The Nice Guys", "Spy", "The Grand Budapest Hotel"];
const HAPPY: &[&str] = &["The Secret Life of Walter Mitty", "About Time", "Sing Street"];
const SAD: &[&str] = &[
    "Eternal Sunshine of the Spotless Mind",
    "Her",
    "The Fault in Our Stars",
];
const ROMANCE: &[&str] = &["About Time", "The Notebook", "La La Land"];
const TEEN: &[&str] = &[
    "The Fault in Our Stars",
    "To All the Boys I've Loved Before",
    "Love, Simon",
];
const SCI_FI: &[&str] = &["Interstellar", "Arrival", "Blade Runner 2049", "Ex Machina"];
const FRIENDSHIP: &[&str] = &["Paddington 2", "The Intouchables", "Toy Story"];
const TWIST: &[&str] = &["The Prestige", "The Sixth Sense", "Fight Club"];

const LIBRARY: &[(&str, &[&str])] = &[
    ("sci-fi", SCI_FI),
    (
        "emotional",
        &["Eternal Sunshine of the Spotless Mind", "Interstellar", "Her"],
    ),
    ("funny", &["Game Night", "Palm Springs", "The Nice Guys", "Booksmart"]),
    ("comedy", COMEDY),
    ("uplift", UPLIFTING),
    ("lift", UPLIFTING),
    ("uplifting", UPLIFTING),
    ("feel-good", FEEL_GOOD),
    ("feelgood", FEEL_GOOD),
    ("happy", HAPPY),
    ("sad", SAD),
    ("romance", ROMANCE),
    ("teen", TEEN),
    ("light", &["Chef", "Julie & Julia", "The Grand Budapest Hotel"]),
    ("friendship", FRIENDSHIP),
    ("cozy", &["Paddington 2", "Chef", "Julie & Julia"]),
    ("dark", &["Gone Girl", "Prisoners", "Zodiac"]),
    ("suspenseful", &["Shutter Island", "Se7en", "The Prestige"]),
    ("twist", TWIST),
    ("inspiring", &["The Pursuit of Happyness", "Hidden Figures", "The Blind Side"]),
    ("hopeful", &["The Pursuit of Happyness", "The Martian", "The Blind Side"]),
    ("true story", &["The Imitation Game", "Spotlight", "A Beautiful Mind"]),
];

/// Maximum number of candidates handed to the resolver
const MAX_CANDIDATES: usize = 6;

fn titles_for(tag: &str) -> Option<&'static [&'static str]> {
    LIBRARY
        .iter()
        .find(|(key, _)| *key == tag)
        .map(|(_, titles)| *titles)
}

fn push_unique<'a>(into: &mut Vec<&'a str>, items: impl IntoIterator<Item = &'a str>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

/// Builds the ordered, deduplicated candidate title list for a prompt
///
/// Tags come from the analysis (genre, mood, themes) followed by the raw
/// lowercased prompt tokens. Each tag goes through exact lookup plus the
/// synonym/prefix folding rules, in a fixed order.
pub fn pick_fallback_titles(prompt: &str, analysis: &PromptAnalysis) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut push_tag = |tag: String| {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    };
    if let Some(genre) = &analysis.genre {
        push_tag(genre.to_lowercase());
    }
    if let Some(mood) = &analysis.mood {
        push_tag(mood.to_lowercase());
    }
    for theme in &analysis.themes {
        push_tag(theme.to_lowercase());
    }
    for token in prompt.to_lowercase().split_whitespace() {
        push_tag(token.to_string());
    }

    let mut candidates: Vec<&str> = Vec::new();
    for tag in &tags {
        if let Some(titles) = titles_for(tag) {
            push_unique(&mut candidates, titles.iter().copied());
        }
        if tag.contains("feel") && tag.contains("good") {
            push_unique(&mut candidates, FEEL_GOOD.iter().copied());
        }
        if tag.starts_with("uplift") || tag.starts_with("lift") {
            push_unique(&mut candidates, UPLIFTING.iter().copied());
        }
        if tag.contains("funny") || tag.contains("comedy") {
            push_unique(&mut candidates, COMEDY.iter().copied());
        }
        if tag.contains("happy") {
            push_unique(&mut candidates, HAPPY.iter().copied());
        }
        if tag.contains("sad") {
            push_unique(&mut candidates, SAD.iter().copied());
        }
        if tag.contains("teen") {
            push_unique(&mut candidates, TEEN.iter().copied());
        }
        if tag.contains("romance") || tag.contains("love") {
            push_unique(&mut candidates, ROMANCE.iter().copied());
        }
        if tag == "sci-fi" || tag == "science fiction" {
            push_unique(&mut candidates, SCI_FI.iter().copied());
        }
        if tag.contains("friend") {
            push_unique(&mut candidates, FRIENDSHIP.iter().copied());
        }
        if tag.contains("twist") {
            push_unique(&mut candidates, TWIST.iter().copied());
        }
    }

    candidates.truncate(MAX_CANDIDATES);
    candidates.into_iter().map(str::to_string).collect()
}
