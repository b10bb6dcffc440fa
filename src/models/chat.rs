use serde::{Deserialize, Serialize};

/// A single turn in a conversation, owned by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Detected emotional state driving tone and prompt selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Sad,
    Anxious,
    Angry,
    Tired,
    Happy,
    Neutral,
}

impl MoodLabel {
    /// Parses a wire label; anything unknown maps to no label
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sad" => Some(Self::Sad),
            "anxious" => Some(Self::Anxious),
            "angry" => Some(Self::Angry),
            "tired" => Some(Self::Tired),
            "happy" => Some(Self::Happy),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Desired recommendation style: match the current mood or lift it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Match,
    Uplift,
}

impl Preference {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "match" => Some(Self::Match),
            "uplift" => Some(Self::Uplift),
            _ => None,
        }
    }
}

/// Action signal carried by a chat response; empty string on the wire
/// means no action
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChatAction {
    #[serde(rename = "recommend")]
    Recommend,
    #[default]
    #[serde(rename = "")]
    None,
}

/// Provenance of a chat response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Generative,
    Local,
}

/// A complete chat response
///
/// Invariant: `reply` is never empty, and `action == Recommend` implies
/// `prompt` is present and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatEnvelope {
    pub reply: String,
    pub mood: MoodLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<Preference>,
    #[serde(default)]
    pub action: ChatAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub engine: Engine,
}
