//! Dashboard statistics handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::AppState;

pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.compute_aggregate_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}
