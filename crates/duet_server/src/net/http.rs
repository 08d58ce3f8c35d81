//! Plain HTTP handlers.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use super::AppState;

/// Serve the story-graph document exactly as authored.
pub async fn game_data_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.story.raw_json().to_string(),
    )
}
