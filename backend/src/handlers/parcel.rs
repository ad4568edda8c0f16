//! Parcel HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub enrich: bool,
}

/// All parcels as a GeoJSON FeatureCollection
pub async fn list_parcels(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.list_parcels().await {
        Ok(collection) => (StatusCode::OK, Json(collection)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// One parcel with alerts and pending recommendations
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(parcel_id): Path<i32>,
    Query(query): Query<DetailQuery>,
) -> impl IntoResponse {
    match state.query.get_parcel_detail(parcel_id, query.enrich).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// One parcel, always enriched with upstream data
pub async fn get_enriched_parcel(
    State(state): State<AppState>,
    Path(parcel_id): Path<i32>,
) -> impl IntoResponse {
    match state.query.get_enriched_parcel(parcel_id).await {
        Ok(parcel) => (StatusCode::OK, Json(parcel)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Water status of every parcel, most stressed first
pub async fn get_water_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.water_status().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}
