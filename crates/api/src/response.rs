//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use dashboard_core::{DateRange, Dimension, DimensionFilter};
use event_source::LoadOutcome;
use serde::{Deserialize, Serialize};
use telemetry::{ComponentHealthReport, HealthStatus, MetricsSnapshot};

/// Envelope for every filtered query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse<T> {
    pub filter: DimensionFilter,
    pub window: DateRange,
    /// Rows in the filtered view the data was computed from.
    pub rows: usize,
    pub data: T,
}

/// Selector options for one dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub dimension: Dimension,
    pub options: Vec<String>,
}

/// Result of a manual dataset refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub source: String,
    pub rows: usize,
    pub error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl From<&LoadOutcome> for RefreshResponse {
    fn from(outcome: &LoadOutcome) -> Self {
        Self {
            source: outcome.source.clone(),
            rows: outcome.rows,
            error: outcome.error.clone(),
            loaded_at: outcome.loaded_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealthReport>,
    pub metrics: MetricsSnapshot,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API error with a stable error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "VALID_001", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<dashboard_core::Error> for ApiError {
    fn from(err: dashboard_core::Error) -> Self {
        use dashboard_core::Error;

        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &err {
            Error::Ingestion { message, .. } => message.clone(),
            Error::Parse(msg)
            | Error::Config(msg)
            | Error::NoData(msg)
            | Error::Validation(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::Serialization(_) => err.to_string(),
        };
        ApiError::with_code(status, err.error_code(), message)
    }
}
