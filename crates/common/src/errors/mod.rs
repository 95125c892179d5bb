//! Error types for the demo service
//!
//! Provides:
//! - Distinct error types for each downstream failure mode
//! - HTTP status code mapping
//! - The `{"Response": ...}` envelope for error bodies

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Fixed body returned when the visit listing cannot be produced
pub const RECENT_VISITS_ERROR: &str = "Error, unable to produce recent visits";

/// Error codes for machine-readable error identification in logs
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,
    RecentVisitsUnavailable,

    // External service errors (8xxx)
    UpstreamError,
    ProbeInvocationError,
    SecretStoreError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,
            ErrorCode::RecentVisitsUnavailable => 7003,

            ErrorCode::UpstreamError => 8001,
            ErrorCode::ProbeInvocationError => 8002,
            ErrorCode::SecretStoreError => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    #[error("{}", RECENT_VISITS_ERROR)]
    RecentVisitsUnavailable,

    // External service errors
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Connectivity probe could not run: {message}")]
    ProbeInvocation { message: String },

    #[error("Secret store error: {message}")]
    SecretStore { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::RecentVisitsUnavailable => ErrorCode::RecentVisitsUnavailable,
            AppError::Upstream(_) => ErrorCode::UpstreamError,
            AppError::ProbeInvocation { .. } => ErrorCode::ProbeInvocationError,
            AppError::SecretStore { .. } => ErrorCode::SecretStoreError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 502 Bad Gateway
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            AppError::Database(_) |
            AppError::DatabaseConnection { .. } |
            AppError::RecentVisitsUnavailable |
            AppError::ProbeInvocation { .. } |
            AppError::SecretStore { .. } |
            AppError::Internal { .. } |
            AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

/// Error body, wrapped in the same envelope as successful responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Response")]
    pub response: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        }

        (status, Json(ErrorResponse { response: message })).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}
