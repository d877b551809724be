//! Transport-neutral request descriptor

use jobboard_common::errors::{AppError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Everything a handler may read from an incoming request
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    pub method: String,
    pub path: String,
    /// Raw body; `None` when the request carried none
    pub body: Option<String>,
    pub query: HashMap<String, String>,
    /// Filled in by the router for parameterized routes
    pub path_params: HashMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_query_param(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    /// Query parameter, treating an empty value as absent
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Deserialize a JSON object body.
    ///
    /// A missing body is a validation error. Malformed JSON, or JSON that
    /// is not an object, is an invalid payload. Both map to 400.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| AppError::Validation {
                message: "Request body is required".to_string(),
                field: None,
            })?;

        let invalid = |e: serde_json::Error| AppError::InvalidPayload {
            message: e.to_string(),
        };

        let value: Value = serde_json::from_str(body).map_err(invalid)?;
        if !value.is_object() {
            return Err(AppError::InvalidPayload {
                message: "Request body must be a JSON object".to_string(),
            });
        }
        serde_json::from_value(value).map_err(invalid)
    }
}
