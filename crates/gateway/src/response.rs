//! Response envelope
//!
//! Every handler result, including errors, leaves the service as an
//! [`ApiResponse`]: a status code, JSON content type, a permissive CORS
//! origin header and a serialized body.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use jobboard_common::errors::AppError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{error, warn};

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// Serialize `payload` into an envelope
    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self::raw(status, body),
            Err(e) => {
                error!(error = %e, "Failed to serialize response payload");
                Self::from(AppError::Serialization(e))
            }
        }
    }

    pub fn ok<T: Serialize>(payload: &T) -> Self {
        Self::json(StatusCode::OK, payload)
    }

    pub fn created<T: Serialize>(payload: &T) -> Self {
        Self::json(StatusCode::CREATED, payload)
    }

    fn raw(status: StatusCode, body: String) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);

        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Parsed body, for inspection in tests and logs
    pub fn payload(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

impl From<AppError> for ApiResponse {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            error!(error = %err, code = ?err.code(), "Request failed");
        } else {
            warn!(error = %err, code = ?err.code(), "Request rejected");
        }

        // The payload is built from plain JSON values and always serializes
        Self::raw(err.status_code(), err.payload().to_string())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_headers() {
        let response = ApiResponse::ok(&json!({ "message": "hi" }));

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], "application/json");
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.payload(), json!({ "message": "hi" }));
    }

    #[test]
    fn test_route_not_found_envelope() {
        let response = ApiResponse::from(AppError::RouteNotFound {
            method: "GET".into(),
            path: "/nope".into(),
            available_endpoints: vec!["GET /".into(), "GET /jobs".into()],
        });

        assert_eq!(response.status_code, 404);
        let body = response.payload();
        assert_eq!(body["message"], "Endpoint not found");
        assert_eq!(body["path"], "/nope");
        assert_eq!(body["method"], "GET");
        assert_eq!(body["availableEndpoints"], json!(["GET /", "GET /jobs"]));
    }

    #[test]
    fn test_internal_fault_envelope() {
        let response = ApiResponse::from(AppError::Internal {
            message: "boom".into(),
        });

        assert_eq!(response.status_code, 500);
        let body = response.payload();
        assert_eq!(body["message"], "Internal server error");
        assert!(body["error"].as_str().unwrap().contains("boom"));
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_into_axum_response() {
        let response = ApiResponse::created(&json!({ "ok": true })).into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
