//! Unified error types for the dashboard backend.
//!
//! Error codes:
//! - INGEST_001-002: Data source errors
//! - PARSE_001: Payload parsing errors
//! - CONFIG_001: Configuration errors
//! - DATA_001: No data available

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Ingestion error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestErrorCode {
    /// INGEST_001: Source unreachable (network or file system)
    Unreachable,
    /// INGEST_002: Source answered with a non-success status
    BadStatus,
}

impl IngestErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreachable => "INGEST_001",
            Self::BadStatus => "INGEST_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        502
    }
}

/// Unified error type for the dashboard backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Data source error with code.
    #[error("[{code}] {message}")]
    Ingestion {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("[PARSE_001] {0}")]
    Parse(String),

    #[error("[CONFIG_001] {0}")]
    Config(String),

    /// The dataset is empty; carries the load error when there was one.
    #[error("[DATA_001] {0}")]
    NoData(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an ingestion error.
    pub fn ingestion(code: IngestErrorCode, msg: impl Into<String>) -> Self {
        Self::Ingestion {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Ingestion { http_status, .. } => *http_status,
            Self::Parse(_) => 502,
            Self::Config(_) => 500,
            Self::NoData(_) => 503,
            Self::Validation(_) => 400,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ingestion { code, .. } => code,
            Self::Parse(_) => "PARSE_001",
            Self::Config(_) => "CONFIG_001",
            Self::NoData(_) => "DATA_001",
            Self::Validation(_) | Self::Serialization(_) => "VALID_001",
            Self::Internal(_) => "INTERNAL_001",
        }
    }
}
