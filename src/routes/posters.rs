use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Curated titles whose posters decorate the landing page
const SEED_TITLES: &[&str] = &[
    "Inception",
    "Interstellar",
    "The Dark Knight",
    "La La Land",
    "Parasite",
    "Avatar",
    "The Social Network",
    "The Grand Budapest Hotel",
    "Coco",
    "Everything Everywhere All at Once",
];

#[derive(Debug, Serialize)]
pub struct PostersResponse {
    pub posters: Vec<String>,
}

/// Handler for the poster seed endpoint
///
/// Best-effort: failed lookups and missing posters are skipped, and without
/// a movie database credential the list is simply empty.
pub async fn posters(State(state): State<AppState>) -> Json<PostersResponse> {
    let Some(movies) = state.movies.as_ref() else {
        return Json(PostersResponse { posters: vec![] });
    };

    let mut posters = Vec::new();
    for title in SEED_TITLES {
        match movies.find_by_title(title, None).await {
            Ok(Some(movie)) => {
                if let Some(poster) = movie.poster.filter(|poster| poster != "N/A") {
                    posters.push(poster);
                }
            }
            Ok(None) => {}
            Err(error) => {
                tracing::debug!(error = %error, title = %title, "poster lookup failed");
            }
        }
    }

    Json(PostersResponse { posters })
}
