//! Irrigation recommendation HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::AppState;

/// Pending recommendations, most urgent first
pub async fn list_recommendations(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.list_pending_recommendations().await {
        Ok(recommendations) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": recommendations.len(),
                "recommandations": recommendations,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Mark a recommendation applied
pub async fn apply_recommendation(
    State(state): State<AppState>,
    Path(recommendation_id): Path<i32>,
) -> impl IntoResponse {
    match state.query.mark_recommendation_applied(recommendation_id).await {
        Ok(recommendation) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "Recommandation appliquée",
                "recommandation": recommendation,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
