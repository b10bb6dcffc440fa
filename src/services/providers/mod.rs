//! Upstream provider abstractions
//!
//! Two seams: the movie metadata database (OMDb) and the generative text
//! backends (Gemini, OpenAI). Both are traits so the resolver and the chat
//! adapter can be exercised against mocks.

use crate::{
    error::AppResult,
    models::{Message, MovieRecord, SearchHit},
};

pub mod gemini;
pub mod omdb;
pub mod openai;

pub use gemini::GeminiBackend;
pub use omdb::OmdbClient;
pub use openai::OpenAiBackend;

/// Movie metadata database queryable by exact title, by id, and by
/// free-text search with an optional year filter
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieDatabase: Send + Sync {
    /// Exact-title lookup; `None` when the database has no match
    async fn find_by_title<'a>(
        &self,
        title: &str,
        year: Option<&'a str>,
    ) -> AppResult<Option<MovieRecord>>;

    /// Full detail record by id
    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<MovieRecord>>;

    /// Free-text search restricted to movies; empty when nothing matches
    async fn search<'a>(&self, query: &str, year: Option<&'a str>)
        -> AppResult<Vec<SearchHit>>;
}

/// Generative chat-completion backend
///
/// Implementations return the trimmed, non-empty response text; callers own
/// parsing and normalization.
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        messages: &[Message],
        temperature: f32,
    ) -> AppResult<String>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
