//! Search gateway error type

use jobboard_common::AppError;
use std::fmt::Display;
use thiserror::Error;

/// Result type for every gateway operation
pub type GatewayResult<T> = std::result::Result<T, SearchUnavailable>;

/// The search engine could not serve a request.
///
/// Covers unreachable hosts, timeouts, rejected requests and undecodable
/// responses alike; `cause` keeps the underlying description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("search engine {operation} failed: {cause}")]
pub struct SearchUnavailable {
    pub operation: &'static str,
    pub cause: String,
}

impl SearchUnavailable {
    pub fn new(operation: &'static str, cause: impl Display) -> Self {
        Self {
            operation,
            cause: cause.to_string(),
        }
    }
}

impl From<SearchUnavailable> for AppError {
    fn from(err: SearchUnavailable) -> Self {
        AppError::SearchUnavailable {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_converts_to_service_unavailable() {
        let err = SearchUnavailable::new("search", "connection refused");
        assert_eq!(err.to_string(), "search engine search failed: connection refused");

        let app: AppError = err.into();
        assert_eq!(app.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
