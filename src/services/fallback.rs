//! Deterministic conversation engine
//!
//! Handles every chat turn when no generative backend is configured or the
//! backend fails. Pure function of the message history; same history, same
//! envelope.

use crate::models::{ChatAction, ChatEnvelope, Engine, Message, MoodLabel, Preference, Role};
use crate::services::intent;

const SMALL_TALK_REPLY: &str = "I'm CineSense, your movie companion. I'm here to chat and help you find something to watch. How are you feeling right now?";
const GREETING_REPLY: &str =
    "Hey! I'm here to chat and help you find a movie. How are you feeling right now?";
const CHOOSE_REPLY: &str =
    "Thanks for sharing that. Want a movie that matches how you feel, or something to lift your mood?";
const MATCH_ACK: &str = "Got it. I'll match the mood and find something fitting.";
const UPLIFT_ACK: &str = "Absolutely. I'll look for something light and uplifting.";

/// Recommendation-prompt template for a (mood, preference) pair
fn prompt_for(mood: MoodLabel, preference: Preference) -> &'static str {
    let (matched, uplift) = match mood {
        MoodLabel::Sad => (
            "an emotional drama about sadness and healing",
            "an uplifting, feel-good movie about hope and friendship",
        ),
        MoodLabel::Anxious => (
            "a tense drama about overcoming anxiety",
            "a calming, lighthearted movie with warm humor",
        ),
        MoodLabel::Angry => (
            "a gritty drama that channels anger into resilience",
            "a fun, uplifting comedy with positive energy",
        ),
        MoodLabel::Tired => (
            "a quiet, reflective drama with a gentle pace",
            "a cozy, comforting movie that's easy to watch",
        ),
        MoodLabel::Happy => (
            "an energetic, upbeat movie with joyful vibes",
            "a feel-good adventure that keeps the good mood going",
        ),
        MoodLabel::Neutral => (
            "an emotional drama with heartfelt storytelling",
            "a light, funny, and uplifting movie",
        ),
    };
    match preference {
        Preference::Match => matched,
        Preference::Uplift => uplift,
    }
}

fn ack_for(preference: Preference) -> &'static str {
    match preference {
        Preference::Match => MATCH_ACK,
        Preference::Uplift => UPLIFT_ACK,
    }
}

fn user_texts(messages: &[Message]) -> Vec<&str> {
    messages
        .iter()
        .filter(|message| message.role == Role::User)
        .map(|message| message.content.as_str())
        .collect()
}

/// Produces a chat response from the full history
///
/// Always returns a non-empty reply; engine is always `local`.
pub fn generate(messages: &[Message]) -> ChatEnvelope {
    let texts = user_texts(messages);
    let latest = texts.last().copied().unwrap_or("");

    // Latest message first, then the earliest mood signal in the history
    let mood = intent::detect_mood(latest)
        .or_else(|| texts.iter().find_map(|text| intent::detect_mood(text)))
        .unwrap_or(MoodLabel::Neutral);

    // Preference only counts from the latest message
    let preference = intent::detect_preference(latest);

    let year = intent::extract_year(latest)
        .or_else(|| texts.iter().find_map(|text| intent::extract_year(text)));

    let recommend = |preference: Preference, year: Option<String>| ChatEnvelope {
        reply: ack_for(preference).to_string(),
        mood,
        preference: Some(preference),
        action: ChatAction::Recommend,
        prompt: Some(prompt_for(mood, preference).to_string()),
        year,
        engine: Engine::Local,
    };
    let plain = |reply: &str, year: Option<String>| ChatEnvelope {
        reply: reply.to_string(),
        mood,
        preference: None,
        action: ChatAction::None,
        prompt: None,
        year,
        engine: Engine::Local,
    };

    if let Some(preference) = preference {
        return recommend(preference, year);
    }

    if intent::detect_small_talk(latest) {
        return plain(SMALL_TALK_REPLY, year);
    }
    if intent::detect_greeting(latest) {
        return plain(GREETING_REPLY, year);
    }
    if intent::detect_another(latest) {
        // Reuse the earliest preference the user ever expressed
        let earlier = texts
            .iter()
            .find_map(|text| intent::detect_preference(text));
        if let Some(preference) = earlier {
            return recommend(preference, year);
        }
    }

    plain(CHOOSE_REPLY, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(turns: &[(&str, &str)]) -> Vec<Message> {
        turns
            .iter()
            .map(|(role, content)| match *role {
                "user" => Message::user(*content),
                _ => Message::assistant(*content),
            })
            .collect()
    }

    #[test]
    fn test_reply_is_never_empty() {
        let cases: Vec<Vec<Message>> = vec![
            vec![],
            history(&[("user", "")]),
            history(&[("user", "hi")]),
            history(&[("user", "I'm sad"), ("assistant", "x"), ("user", "cheer me up")]),
            history(&[("user", "qwerty zxcvb")]),
        ];
        for messages in cases {
            let envelope = generate(&messages);
            assert!(!envelope.reply.is_empty());
            assert_eq!(envelope.engine, Engine::Local);
        }
    }

    #[test]
    fn test_deterministic_for_same_history() {
        let messages = history(&[("user", "feeling kind of down today")]);
        assert_eq!(generate(&messages), generate(&messages));
    }

    #[test]
    fn test_greeting_reply() {
        let envelope = generate(&history(&[("user", "hi")]));
        assert_eq!(envelope.reply, GREETING_REPLY);
        assert_eq!(envelope.mood, MoodLabel::Neutral);
        assert_eq!(envelope.action, ChatAction::None);
        assert!(envelope.prompt.is_none());
    }

    #[test]
    fn test_small_talk_beats_greeting() {
        let envelope = generate(&history(&[("user", "hey, what's your name?")]));
        assert_eq!(envelope.reply, SMALL_TALK_REPLY);
        assert_eq!(envelope.action, ChatAction::None);
    }

    #[test]
    fn test_preference_triggers_recommend() {
        let envelope = generate(&history(&[
            ("user", "I feel pretty sad"),
            ("assistant", CHOOSE_REPLY),
            ("user", "cheer me up please"),
        ]));
        assert_eq!(envelope.action, ChatAction::Recommend);
        assert_eq!(envelope.preference, Some(Preference::Uplift));
        assert_eq!(envelope.mood, MoodLabel::Sad);
        assert_eq!(
            envelope.prompt.as_deref(),
            Some("an uplifting, feel-good movie about hope and friendship")
        );
        assert_eq!(envelope.reply, UPLIFT_ACK);
    }

    #[test]
    fn test_match_and_uplift_acks_differ() {
        let matched = generate(&history(&[("user", "match my mood")]));
        let uplifted = generate(&history(&[("user", "cheer me up")]));
        assert_ne!(matched.reply, uplifted.reply);
    }

    #[test]
    fn test_another_reuses_earlier_preference() {
        let envelope = generate(&history(&[
            ("user", "I feel sad"),
            ("assistant", CHOOSE_REPLY),
            ("user", "cheer me up"),
            ("assistant", UPLIFT_ACK),
            ("user", "another one"),
        ]));
        assert_eq!(envelope.action, ChatAction::Recommend);
        assert_eq!(envelope.preference, Some(Preference::Uplift));
        assert!(envelope.prompt.as_deref().is_some_and(|p| !p.is_empty()));
        assert_eq!(envelope.mood, MoodLabel::Sad);
    }

    #[test]
    fn test_another_without_history_asks_for_choice() {
        let envelope = generate(&history(&[("user", "another one")]));
        assert_eq!(envelope.action, ChatAction::None);
        assert_eq!(envelope.reply, CHOOSE_REPLY);
    }

    #[test]
    fn test_year_from_history() {
        let envelope = generate(&history(&[
            ("user", "something from 2014"),
            ("assistant", CHOOSE_REPLY),
            ("user", "match my mood"),
        ]));
        assert_eq!(envelope.year.as_deref(), Some("2014"));
    }

    #[test]
    fn test_unknown_mood_uses_neutral_prompt_row() {
        let envelope = generate(&history(&[("user", "just match it")]));
        assert_eq!(envelope.mood, MoodLabel::Neutral);
        assert_eq!(
            envelope.prompt.as_deref(),
            Some("an emotional drama with heartfelt storytelling")
        );
    }
}
