//! Disease alert HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::AppState;

/// Every alert with its parcel, newest first
pub async fn list_alerts(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.list_alerts().await {
        Ok(alerts) => (
            StatusCode::OK,
            Json(serde_json::json!({ "count": alerts.len(), "alertes": alerts })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
