//! Pass-through handlers to the upstream analytic services
//!
//! An available upstream answer is relayed with its own status and body. An
//! unavailable upstream yields 503 naming the service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::external::{
    agro_rules, ai_recommendation, water_forecast, ParcelContext, UpstreamOutcome,
    UpstreamService,
};
use crate::AppState;

/// Default sensor history window in days
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Longest sensor history window accepted
pub const MAX_HISTORY_DAYS: u32 = 365;

const WATER_LABEL: &str = "MS4 (Water Prediction)";
const RULES_LABEL: &str = "MS5 (Agro Rules)";
const AI_LABEL: &str = "MS6 (AI Recommendations)";

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<u32>,
}

fn relay(outcome: UpstreamOutcome, service: &'static str, label: &str) -> Response {
    match outcome {
        UpstreamOutcome::Available { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
            (status, Json(body)).into_response()
        }
        UpstreamOutcome::Unavailable { .. } => AppError::UpstreamUnavailable {
            service,
            message: format!("{} is not responding", label),
        }
        .into_response(),
    }
}

/// Seven-day water-stress forecast for a parcel
pub async fn get_forecast(State(state): State<AppState>, Path(parcel_id): Path<i32>) -> Response {
    let outcome = state.clients.water.forecast(parcel_id).await;
    relay(outcome, water_forecast::SERVICE_NAME, WATER_LABEL)
}

/// Agronomic rule evaluation for a known parcel
pub async fn get_rules_evaluation(
    State(state): State<AppState>,
    Path(parcel_id): Path<i32>,
) -> Response {
    let parcel = match state.query.get_parcel(parcel_id).await {
        Ok(parcel) => parcel,
        Err(e) => return e.into_response(),
    };

    let context = ParcelContext::derive(&parcel, Utc::now());
    let outcome = state.clients.rules.evaluate(parcel_id, &context).await;
    relay(outcome, agro_rules::SERVICE_NAME, RULES_LABEL)
}

/// AI irrigation recommendation for a known parcel
pub async fn get_ai_recommendations(
    State(state): State<AppState>,
    Path(parcel_id): Path<i32>,
) -> Response {
    let parcel = match state.query.get_parcel(parcel_id).await {
        Ok(parcel) => parcel,
        Err(e) => return e.into_response(),
    };

    let context = ParcelContext::derive(&parcel, Utc::now());
    let outcome = state.clients.ai.evaluate(parcel_id, &context).await;
    relay(outcome, ai_recommendation::SERVICE_NAME, AI_LABEL)
}

/// Past irrigation plans of a parcel
pub async fn get_irrigation_history(
    State(state): State<AppState>,
    Path(parcel_id): Path<i32>,
) -> Response {
    let outcome = state.clients.ai.irrigation_history(parcel_id).await;
    relay(outcome, ai_recommendation::SERVICE_NAME, AI_LABEL)
}

/// Raw readings of a sensor
pub async fn get_sensor_history(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    if !water_forecast::is_valid_sensor_id(&sensor_id) {
        return AppError::Validation {
            field: "sensor_id".to_string(),
            message: "sensor_id may only contain letters, digits, '_' and '-'".to_string(),
        }
        .into_response();
    }

    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if days == 0 || days > MAX_HISTORY_DAYS {
        return AppError::Validation {
            field: "days".to_string(),
            message: format!("days must be between 1 and {}", MAX_HISTORY_DAYS),
        }
        .into_response();
    }

    let outcome = state.clients.water.sensor_history(&sensor_id, days).await;
    relay(outcome, water_forecast::SERVICE_NAME, WATER_LABEL)
}
