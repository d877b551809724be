//! Error types for the Job Board services
//!
//! Provides the error taxonomy shared by every crate:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error payloads matching the public API contract
//! - Error codes for client handling

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidPayload,

    // Resource errors (4xxx)
    NotFound,
    RouteNotFound,

    // External service errors (8xxx)
    SearchUnavailable,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidPayload => 1002,

            ErrorCode::NotFound => 4001,
            ErrorCode::RouteNotFound => 4002,

            ErrorCode::SearchUnavailable => 8001,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid request payload: {message}")]
    InvalidPayload { message: String },

    // Resource errors
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    #[error("No route for {method} {path}")]
    RouteNotFound {
        method: String,
        path: String,
        available_endpoints: Vec<String>,
    },

    // External service errors
    #[error("Search service unavailable: {message}")]
    SearchUnavailable { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidPayload { .. } => ErrorCode::InvalidPayload,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::RouteNotFound { .. } => ErrorCode::RouteNotFound,
            AppError::SearchUnavailable { .. } => ErrorCode::SearchUnavailable,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } | AppError::InvalidPayload { .. } => {
                StatusCode::BAD_REQUEST
            }

            // 404 Not Found
            AppError::NotFound { .. } | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,

            // 503 Service Unavailable
            AppError::SearchUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// JSON payload returned to the caller for this error.
    ///
    /// Route misses list every registered endpoint; server faults only carry
    /// a generic message plus the fault description.
    pub fn payload(&self) -> Value {
        match self {
            AppError::RouteNotFound {
                method,
                path,
                available_endpoints,
            } => json!({
                "message": "Endpoint not found",
                "path": path,
                "method": method,
                "availableEndpoints": available_endpoints,
                "code": self.code(),
            }),
            AppError::Validation { message, field } => json!({
                "message": message,
                "field": field,
                "code": self.code(),
            }),
            AppError::InvalidPayload { message } => json!({
                "message": "Invalid request payload",
                "error": message,
                "code": self.code(),
            }),
            AppError::NotFound { resource_type, .. } => json!({
                "message": format!("{} not found", resource_type),
                "code": self.code(),
            }),
            AppError::SearchUnavailable { message } => json!({
                "message": "Search service temporarily unavailable",
                "error": message,
                "code": self.code(),
            }),
            _ => json!({
                "message": "Internal server error",
                "error": self.to_string(),
                "code": self.code(),
            }),
        }
    }
}
