//! Error handling for the parcel monitoring dashboard
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ModelError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Upstream service errors
    #[error("{service} unavailable: {message}")]
    UpstreamUnavailable {
        service: &'static str,
        message: String,
    },

    // Stored values that do not map onto the domain model
    #[error("Invalid stored value: {0}")]
    InvalidRecord(#[from] ModelError),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidRecord(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> ErrorDetail {
        let (code, message, field, service) = match self {
            AppError::NotFound(resource) => {
                ("NOT_FOUND", format!("{} not found", resource), None, None)
            }
            AppError::Validation { field, message } => (
                "VALIDATION_ERROR",
                message.clone(),
                Some(field.clone()),
                None,
            ),
            AppError::UpstreamUnavailable { service, message } => (
                "UPSTREAM_UNAVAILABLE",
                message.clone(),
                None,
                Some(service.to_string()),
            ),
            AppError::InvalidRecord(_) => (
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                None,
                None,
            ),
            AppError::DatabaseError(_) => (
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
                None,
                None,
            ),
        };

        ErrorDetail {
            code: code.to_string(),
            message,
            field,
            service,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: self.detail() })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
