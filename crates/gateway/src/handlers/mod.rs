//! API handlers module
//!
//! Every request resolves to an [`Endpoint`] through the route table and
//! is dispatched from here. Handlers return `Result<ApiResponse>`; errors
//! are turned into envelopes at this boundary, never further up.

pub mod companies;
pub mod health;
pub mod index;
pub mod jobs;

use jobboard_common::{errors::Result, metrics::RequestMetrics};
use tracing::debug;

use crate::request::RequestDescriptor;
use crate::response::ApiResponse;
use crate::router::RouteTable;
use crate::AppState;

/// Handlers reachable through the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ApiInfo,
    ListJobs,
    SearchJobs,
    JobAggregations,
    CreateJob,
    Health,
    SearchEngineHealth,
    ListCompanies,
    GetCompany,
    CreateCompany,
}

/// Build the application route table
pub fn route_table() -> Result<RouteTable<Endpoint>> {
    let mut table = RouteTable::new();
    table
        .route("GET", "/", Endpoint::ApiInfo)?
        .route("GET", "/jobs", Endpoint::ListJobs)?
        .route("GET", "/jobs/search", Endpoint::SearchJobs)?
        .route("GET", "/jobs/aggregations", Endpoint::JobAggregations)?
        .route("POST", "/jobs", Endpoint::CreateJob)?
        .route("GET", "/health", Endpoint::Health)?
        .route("GET", "/search-engine/health", Endpoint::SearchEngineHealth)?
        .route("GET", "/companies", Endpoint::ListCompanies)?
        .route("GET", "/companies/{id}", Endpoint::GetCompany)?
        .route("POST", "/companies", Endpoint::CreateCompany)?;
    Ok(table)
}

/// Resolve and run a request, always producing an envelope
pub async fn dispatch(state: &AppState, request: RequestDescriptor) -> ApiResponse {
    let (endpoint, route, params) = match state.routes.resolve(&request.method, &request.path) {
        Ok(found) => (*found.handler, found.key.to_string(), found.params),
        Err(err) => {
            let metrics = RequestMetrics::start(&request.method, "unmatched");
            let response = ApiResponse::from(err);
            metrics.finish(response.status_code);
            return response;
        }
    };

    debug!(route = %route, ?endpoint, "Route resolved");
    let metrics = RequestMetrics::start(&request.method, &route);

    let request = request.with_path_params(params);
    let response = invoke(state, endpoint, &request)
        .await
        .unwrap_or_else(ApiResponse::from);

    metrics.finish(response.status_code);
    response
}

async fn invoke(state: &AppState, endpoint: Endpoint, request: &RequestDescriptor) -> Result<ApiResponse> {
    match endpoint {
        Endpoint::ApiInfo => index::api_info().await,
        Endpoint::ListJobs => jobs::list_jobs(state, request).await,
        Endpoint::SearchJobs => jobs::search_jobs(state, request).await,
        Endpoint::JobAggregations => jobs::aggregations(state).await,
        Endpoint::CreateJob => jobs::create_job(state, request).await,
        Endpoint::Health => health::health().await,
        Endpoint::SearchEngineHealth => health::search_engine_health(state).await,
        Endpoint::ListCompanies => companies::list_companies(state, request).await,
        Endpoint::GetCompany => companies::get_company(state, request).await,
        Endpoint::CreateCompany => companies::create_company(state, request).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use jobboard_common::{Company, Job, MemoryStore};
    use jobboard_search::MockGateway;
    use std::sync::Arc;

    use super::route_table;
    use crate::AppState;

    /// State over seeded stores and the given mock gateway
    pub fn state_with(gateway: Arc<MockGateway>) -> AppState {
        AppState {
            jobs: Arc::new(MemoryStore::with_records(Job::samples())),
            companies: Arc::new(MemoryStore::with_records(Company::samples())),
            search: gateway,
            routes: Arc::new(route_table().unwrap()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::state_with;
    use super::*;
    use jobboard_common::Job;
    use jobboard_search::MockGateway;
    use std::sync::Arc;

    #[test]
    fn test_route_table_order() {
        let table = route_table().unwrap();
        assert_eq!(
            table.keys(),
            vec![
                "GET /",
                "GET /jobs",
                "GET /jobs/search",
                "GET /jobs/aggregations",
                "POST /jobs",
                "GET /health",
                "GET /search-engine/health",
                "GET /companies",
                "GET /companies/{id}",
                "POST /companies",
            ]
        );
    }

    #[test]
    fn test_every_route_resolves_to_its_endpoint() {
        let table = route_table().unwrap();
        let cases = [
            ("GET", "/", Endpoint::ApiInfo),
            ("GET", "/jobs", Endpoint::ListJobs),
            ("GET", "/jobs/search", Endpoint::SearchJobs),
            ("GET", "/jobs/aggregations", Endpoint::JobAggregations),
            ("POST", "/jobs", Endpoint::CreateJob),
            ("GET", "/health", Endpoint::Health),
            ("GET", "/search-engine/health", Endpoint::SearchEngineHealth),
            ("GET", "/companies", Endpoint::ListCompanies),
            ("POST", "/companies", Endpoint::CreateCompany),
        ];

        for (method, path, expected) in cases {
            let found = table.resolve(method, path).unwrap();
            assert_eq!(*found.handler, expected, "{method} {path}");
            assert!(found.params.is_empty());
        }

        let found = table.resolve("GET", "/companies/42").unwrap();
        assert_eq!(*found.handler, Endpoint::GetCompany);
        assert_eq!(found.params["id"], "42");
    }

    #[tokio::test]
    async fn test_api_info_end_to_end() {
        let state = state_with(Arc::new(MockGateway::available()));
        let response = dispatch(&state, RequestDescriptor::new("GET", "/")).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.payload()["message"], "Job Board API");
        assert_eq!(response.payload()["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_unknown_route_lists_endpoints() {
        let state = state_with(Arc::new(MockGateway::available()));
        let response = dispatch(&state, RequestDescriptor::new("DELETE", "/jobs")).await;

        assert_eq!(response.status_code, 404);
        let body = response.payload();
        assert_eq!(body["message"], "Endpoint not found");
        assert_eq!(body["method"], "DELETE");
        assert_eq!(body["path"], "/jobs");
        assert_eq!(body["availableEndpoints"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_create_job_end_to_end() {
        let state = state_with(Arc::new(MockGateway::available()));
        let request = RequestDescriptor::new("POST", "/jobs")
            .with_body(r#"{"title":"X","company":"Y","location":"Z","remote":true}"#);

        let response = dispatch(&state, request).await;
        assert_eq!(response.status_code, 201);

        let id = response.payload()["job"]["id"].as_u64().unwrap();
        assert!(id > 0);
        assert!(Job::samples().iter().all(|job| job.id != id));
    }

    #[tokio::test]
    async fn test_company_path_param_reaches_handler() {
        let state = state_with(Arc::new(MockGateway::available()));

        let response = dispatch(&state, RequestDescriptor::new("GET", "/companies/2")).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.payload()["company"]["name"], "StartupXYZ");
    }
}
