//! Health check handlers

use axum::http::StatusCode;
use chrono::Utc;
use jobboard_common::errors::Result;
use jobboard_search::ClusterHealth;
use serde::Serialize;
use tracing::warn;

use crate::response::ApiResponse;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub services: ServiceStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub api: &'static str,
    pub search_engine: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngineHealthResponse {
    pub status: &'static str,
    pub search_engine: SearchEngineCheck,
    pub timestamp: String,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum SearchEngineCheck {
    Up(ClusterHealth),
    Down { error: String },
}

/// Liveness probe - always returns healthy if the server is running
pub async fn health() -> Result<ApiResponse> {
    Ok(ApiResponse::ok(&HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        services: ServiceStatus {
            api: "healthy",
            search_engine: "checking...",
        },
    }))
}

/// Forward the search engine's own health probe
pub async fn search_engine_health(state: &AppState) -> Result<ApiResponse> {
    let timestamp = Utc::now().to_rfc3339();

    let response = match state.search.health_check().await {
        Ok(cluster) => ApiResponse::ok(&SearchEngineHealthResponse {
            status: "healthy",
            search_engine: SearchEngineCheck::Up(cluster),
            timestamp,
        }),
        Err(e) => {
            warn!(error = %e, "Search engine health check failed");
            ApiResponse::json(
                StatusCode::SERVICE_UNAVAILABLE,
                &SearchEngineHealthResponse {
                    status: "unhealthy",
                    search_engine: SearchEngineCheck::Down { error: e.to_string() },
                    timestamp,
                },
            )
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::state_with;
    use jobboard_search::MockGateway;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_is_static() {
        let body = health().await.unwrap().payload();

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"]["api"], "healthy");
        assert_eq!(body["services"]["searchEngine"], "checking...");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_search_engine_healthy() {
        let state = state_with(Arc::new(MockGateway::available()));

        let response = search_engine_health(&state).await.unwrap();
        let body = response.payload();
        assert_eq!(response.status_code, 200);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["searchEngine"]["status"], "green");
        assert_eq!(body["searchEngine"]["numberOfNodes"], 1);
    }

    #[tokio::test]
    async fn test_search_engine_unhealthy_is_degraded() {
        let state = state_with(Arc::new(MockGateway::unavailable()));

        let response = search_engine_health(&state).await.unwrap();
        let body = response.payload();
        assert_eq!(response.status_code, 503);
        assert_eq!(body["status"], "unhealthy");
        assert!(body["searchEngine"]["error"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }
}
