mod chat;
mod movie;

pub use chat::{ChatAction, ChatEnvelope, Engine, Message, MoodLabel, Preference, Role};
pub use movie::{MovieRecord, PromptAnalysis, SearchHit};
