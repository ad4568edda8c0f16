//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::HealthReport;
use crate::AppState;

pub const SERVICE_NAME: &str = "parcel-dashboard-backend";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
}

/// Local liveness with database connectivity
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = if state.query.store_reachable().await {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

/// Liveness of every upstream analytic service
pub async fn upstream_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.probe.check_all().await)
}
