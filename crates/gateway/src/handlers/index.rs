//! API description handler

use jobboard_common::{errors::Result, API_VERSION};
use serde::Serialize;

use crate::response::ApiResponse;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfoResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub available_endpoints: Vec<&'static str>,
    pub documentation: &'static str,
    pub status: &'static str,
}

const ENDPOINT_DESCRIPTIONS: &[&str] = &[
    "GET /jobs - Get all job listings",
    "GET /jobs/search - Search jobs with full-text search and filters",
    "GET /jobs/aggregations - Get job aggregations",
    "POST /jobs - Create a new job listing",
    "GET /companies - Get all companies",
    "GET /companies/{id} - Get a company by id",
    "POST /companies - Create a new company",
    "GET /health - Health check",
    "GET /search-engine/health - Search engine health check",
];

pub async fn api_info() -> Result<ApiResponse> {
    Ok(ApiResponse::ok(&ApiInfoResponse {
        message: "Job Board API",
        version: API_VERSION,
        available_endpoints: ENDPOINT_DESCRIPTIONS.to_vec(),
        documentation: "Job board API with Elasticsearch-backed search and in-memory fallback",
        status: "ok",
    }))
}
