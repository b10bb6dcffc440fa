use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{ChatEnvelope, Message},
    services::chat,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Handler for the conversational endpoint
///
/// Always answers with a complete envelope; upstream health only changes
/// the `engine` tag.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatEnvelope>> {
    if request.messages.is_empty() {
        return Err(AppError::InvalidInput(
            "Please include chat messages.".to_string(),
        ));
    }

    let envelope = chat::send(state.chat_backend.as_deref(), &request.messages).await;
    Ok(Json(envelope))
}
