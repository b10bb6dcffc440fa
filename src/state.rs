use std::sync::Arc;

use crate::config::Config;
use crate::services::providers::{
    GeminiBackend, GenerativeBackend, MovieDatabase, OmdbClient, OpenAiBackend,
};

/// Shared application state
///
/// Only immutable provider handles; nothing here crosses requests as
/// mutable state. Backend precedence is decided once, at startup: Gemini
/// is the chat backend when its key exists, OpenAI only when it is absent.
/// Prompt analysis always uses OpenAI when configured.
#[derive(Clone)]
pub struct AppState {
    pub movies: Option<Arc<dyn MovieDatabase>>,
    pub chat_backend: Option<Arc<dyn GenerativeBackend>>,
    pub analysis_backend: Option<Arc<dyn GenerativeBackend>>,
}

impl AppState {
    /// Wires providers from configuration
    pub fn from_config(config: &Config) -> Self {
        let movies: Option<Arc<dyn MovieDatabase>> = config.omdb_api_key.as_ref().map(|key| {
            Arc::new(OmdbClient::new(key.clone(), config.omdb_api_url.clone()))
                as Arc<dyn MovieDatabase>
        });

        let openai = config.openai_api_key.as_ref().map(|key| {
            Arc::new(OpenAiBackend::new(key.clone(), config.openai_api_url.clone()))
                as Arc<dyn GenerativeBackend>
        });

        let chat_backend: Option<Arc<dyn GenerativeBackend>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiBackend::new(
                key.clone(),
                config.gemini_api_url.clone(),
            )) as Arc<dyn GenerativeBackend>),
            None => openai.clone(),
        };

        tracing::info!(
            movies = movies.is_some(),
            chat_backend = chat_backend.as_ref().map(|b| b.name()),
            analysis_backend = openai.is_some(),
            "providers configured"
        );

        Self {
            movies,
            chat_backend,
            analysis_backend: openai,
        }
    }

    /// State with no providers at all; every request runs on the
    /// deterministic paths
    pub fn unconfigured() -> Self {
        Self {
            movies: None,
            chat_backend: None,
            analysis_backend: None,
        }
    }
}
