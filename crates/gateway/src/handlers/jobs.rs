//! Job handlers
//!
//! Reads try the search engine first and fall back to scanning the data
//! store when it is unavailable. Writes always land in the data store and
//! are mirrored to the search engine on a best-effort basis.

use axum::http::StatusCode;
use jobboard_common::{errors::Result, metrics, FilterCriteria, Job};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

use crate::request::RequestDescriptor;
use crate::response::ApiResponse;
use crate::AppState;

/// Page size for the unfiltered listing
pub const LISTING_PAGE_SIZE: usize = 100;

pub const SOURCE_IN_MEMORY: &str = "in-memory";
pub const SOURCE_FALLBACK: &str = "in-memory-fallback";

#[derive(Serialize)]
pub struct JobListResponse<'a, J: Serialize> {
    pub jobs: Vec<J>,
    pub count: u64,
    pub source: &'a str,
}

#[derive(Serialize)]
pub struct JobSearchResponse<'a, J: Serialize> {
    pub jobs: Vec<J>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    pub filters: &'a FilterCriteria,
    pub source: &'a str,
}

#[derive(Serialize)]
pub struct JobCreatedResponse {
    pub message: &'static str,
    pub job: Job,
    pub indexed: bool,
}

/// List all jobs, or search when any filter is present
pub async fn list_jobs(state: &AppState, request: &RequestDescriptor) -> Result<ApiResponse> {
    let criteria = FilterCriteria::from_query(&request.query);
    if criteria.has_constraints() {
        return search_with(state, &criteria).await;
    }

    let start = Instant::now();
    match state
        .search
        .search("", &FilterCriteria::listing(LISTING_PAGE_SIZE))
        .await
    {
        Ok(results) => {
            let source = state.search.source_name();
            metrics::record_search(start.elapsed().as_secs_f64(), source);
            Ok(ApiResponse::ok(&JobListResponse {
                jobs: results.hits,
                count: results.total,
                source,
            }))
        }
        Err(e) => {
            warn!(error = %e, "Search engine listing failed, serving in-memory data");
            metrics::record_fallback("list");
            metrics::record_search(start.elapsed().as_secs_f64(), SOURCE_IN_MEMORY);

            let jobs = state.jobs.list();
            Ok(ApiResponse::ok(&JobListResponse {
                count: jobs.len() as u64,
                jobs,
                source: SOURCE_IN_MEMORY,
            }))
        }
    }
}

/// Full-text search with filters
pub async fn search_jobs(state: &AppState, request: &RequestDescriptor) -> Result<ApiResponse> {
    let criteria = FilterCriteria::from_query(&request.query);
    search_with(state, &criteria).await
}

async fn search_with(state: &AppState, criteria: &FilterCriteria) -> Result<ApiResponse> {
    let start = Instant::now();

    match state.search.search(criteria.text(), criteria).await {
        Ok(results) => {
            let source = state.search.source_name();
            metrics::record_search(start.elapsed().as_secs_f64(), source);
            Ok(ApiResponse::ok(&JobSearchResponse {
                jobs: results.hits,
                total: results.total,
                aggregations: results.aggregations,
                query: criteria.q.as_deref(),
                filters: criteria,
                source,
            }))
        }
        Err(e) => {
            warn!(error = %e, query = criteria.text(), "Search engine query failed, using in-memory fallback");
            metrics::record_fallback("search");

            let jobs = state.jobs.filter(|job| criteria.matches(job));
            metrics::record_search(start.elapsed().as_secs_f64(), SOURCE_FALLBACK);

            Ok(ApiResponse::ok(&JobSearchResponse {
                total: jobs.len() as u64,
                jobs,
                aggregations: None,
                query: criteria.q.as_deref(),
                filters: criteria,
                source: SOURCE_FALLBACK,
            }))
        }
    }
}

/// Term aggregations; no in-memory equivalent exists
pub async fn aggregations(state: &AppState) -> Result<ApiResponse> {
    match state.search.aggregate().await {
        Ok(aggregations) => Ok(ApiResponse::ok(&serde_json::json!({
            "aggregations": aggregations,
            "source": state.search.source_name(),
        }))),
        Err(e) => {
            warn!(error = %e, "Aggregation unavailable, reporting degraded status");
            metrics::record_fallback("aggregate");
            Ok(ApiResponse::json(
                StatusCode::SERVICE_UNAVAILABLE,
                &serde_json::json!({
                    "status": "degraded",
                    "message": "Search service temporarily unavailable",
                    "error": e.to_string(),
                }),
            ))
        }
    }
}

/// Create a job; the data store write is authoritative
pub async fn create_job(state: &AppState, request: &RequestDescriptor) -> Result<ApiResponse> {
    let job: Job = request.json_body()?;
    let job = state.jobs.append(job);
    info!(job_id = job.id, title = %job.title, "Job created");

    match state.search.index(&job).await {
        Ok(_) => metrics::record_index_write(true),
        Err(e) => {
            warn!(job_id = job.id, error = %e, "Failed to mirror job to search engine");
            metrics::record_index_write(false);
        }
    }

    Ok(ApiResponse::created(&JobCreatedResponse {
        message: "Job created successfully",
        job,
        indexed: true,
    }))
}
