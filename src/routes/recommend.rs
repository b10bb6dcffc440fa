use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, PromptAnalysis},
    services::{analysis, resolver},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub prompt: String,
    pub year: Option<String>,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub movie: MovieRecord,
    pub meta: RecommendMeta,
    pub analysis: PromptAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendMeta {
    pub year_relaxed: bool,
}

/// Handler for the recommendation endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let movies = state.movies.as_ref().ok_or_else(|| {
        AppError::MissingCredential("Missing OMDb API key. Set OMDB_API_KEY.".to_string())
    })?;

    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::InvalidInput(
            "Please provide a short movie description.".to_string(),
        ));
    }

    let analysis = analysis::analyze(state.analysis_backend.as_deref(), prompt).await;

    let resolved = resolver::resolve(
        movies.as_ref(),
        &analysis,
        prompt,
        request.year.as_deref(),
        &request.exclude_ids,
    )
    .await;

    match resolved {
        Some(result) => Ok(Json(RecommendResponse {
            movie: result.movie,
            meta: RecommendMeta {
                year_relaxed: result.year_relaxed,
            },
            analysis,
        })),
        None => Err(AppError::NotFound(
            "No matching movie found. Try a new prompt.".to_string(),
        )),
    }
}
