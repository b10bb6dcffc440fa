//! Generative chat adapter
//!
//! Sends the conversation to the configured generative backend and
//! normalizes its JSON reply into a [`ChatEnvelope`]. Any failure along the
//! way (transport, status, parse, missing reply) hands the whole turn to the
//! deterministic fallback engine; partial generative output is never
//! surfaced.

use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{ChatAction, ChatEnvelope, Engine, Message, MoodLabel, Preference};
use crate::services::fallback;
use crate::services::providers::GenerativeBackend;

const CHAT_SYSTEM_PROMPT: &str = "You are a warm, supportive movie companion named CineSense. Always return valid JSON and ALWAYS include a non-empty reply. If the user greets you or asks about you, respond naturally before asking about how they feel. Only recommend a movie AFTER the user explicitly chooses match or uplift. If a release year is mentioned, include it. If preference is set and you are recommending, you MUST include a concise prompt for the movie recommender. Respond ONLY with JSON: {\"reply\":\"\", \"mood\":\"\", \"preference\":\"match|uplift|\", \"action\":\"recommend|\", \"prompt\":\"\", \"year\":\"\"}.";

const CHAT_TEMPERATURE: f32 = 0.4;

/// Tolerant JSON-object extraction
///
/// Two attempts: strict parse of the whole text, then the substring from the
/// first `{` through the last `}`. Returns `None` when both fail or the
/// parsed value is not an object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let as_object = |value: Value| value.is_object().then_some(value);

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return as_object(value);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .and_then(as_object)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    let field = value.get(key)?;
    let text = match field {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Builds a normalized envelope from a backend JSON object
///
/// A missing, non-string, or empty `reply` is a hard failure. A recommend
/// action without a prompt is cleared so no dangling recommend signal ever
/// leaves the adapter.
fn envelope_from_value(value: &Value) -> AppResult<ChatEnvelope> {
    let reply = string_field(value, "reply")
        .ok_or_else(|| AppError::Upstream("chat backend response missing reply".to_string()))?;

    let mood = string_field(value, "mood")
        .and_then(|m| MoodLabel::parse(&m))
        .unwrap_or(MoodLabel::Neutral);
    let preference = string_field(value, "preference").and_then(|p| Preference::parse(&p));
    let mut prompt = string_field(value, "prompt");
    let year = string_field(value, "year");

    let mut action = match string_field(value, "action").as_deref() {
        Some("recommend") => ChatAction::Recommend,
        _ => ChatAction::None,
    };
    if action == ChatAction::Recommend && prompt.is_none() {
        action = ChatAction::None;
        prompt = None;
    }

    Ok(ChatEnvelope {
        reply,
        mood,
        preference,
        action,
        prompt,
        year,
        engine: Engine::Generative,
    })
}

async fn generative_reply(
    backend: &dyn GenerativeBackend,
    messages: &[Message],
) -> AppResult<ChatEnvelope> {
    let content = backend
        .generate(CHAT_SYSTEM_PROMPT, messages, CHAT_TEMPERATURE)
        .await?;
    let value = extract_json_object(&content)
        .ok_or_else(|| AppError::Upstream("chat backend returned unparsable JSON".to_string()))?;
    envelope_from_value(&value)
}

/// Produces a chat response for the history
///
/// Uses the generative backend when one is configured; every failure falls
/// back to the deterministic engine, tagged `engine=local`.
pub async fn send(backend: Option<&dyn GenerativeBackend>, messages: &[Message]) -> ChatEnvelope {
    if let Some(backend) = backend {
        match generative_reply(backend, messages).await {
            Ok(envelope) => return envelope,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    backend = backend.name(),
                    "generative chat failed, using local engine"
                );
            }
        }
    }
    fallback::generate(messages)
}
