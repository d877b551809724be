//! Company handlers
//!
//! Companies live only in the data store; none of these touch the search
//! engine.

use jobboard_common::{
    errors::{AppError, Result},
    Company,
};
use serde::Serialize;
use tracing::info;

use crate::handlers::jobs::SOURCE_IN_MEMORY;
use crate::request::RequestDescriptor;
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<Company>,
    pub count: usize,
    pub source: &'static str,
}

pub async fn list_companies(state: &AppState, request: &RequestDescriptor) -> Result<ApiResponse> {
    let industry = request.query_param("industry");
    let size = request.query_param("size");
    let location = request.query_param("location");

    let companies = state
        .companies
        .filter(|company| company.matches(industry, size, location));

    Ok(ApiResponse::ok(&CompanyListResponse {
        count: companies.len(),
        companies,
        source: SOURCE_IN_MEMORY,
    }))
}

pub async fn get_company(state: &AppState, request: &RequestDescriptor) -> Result<ApiResponse> {
    let raw = request.path_param("id").unwrap_or_default();
    let id = raw
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation {
            message: "Company ID must be a positive integer".to_string(),
            field: Some("id".to_string()),
        })?;

    let company = state.companies.find(id).ok_or_else(|| AppError::NotFound {
        resource_type: "Company".to_string(),
        id: raw.to_string(),
    })?;

    Ok(ApiResponse::ok(&serde_json::json!({
        "company": company,
        "source": SOURCE_IN_MEMORY,
    })))
}

pub async fn create_company(state: &AppState, request: &RequestDescriptor) -> Result<ApiResponse> {
    let company: Company = request.json_body()?;
    let company = state.companies.append(company);
    info!(company_id = company.id, name = %company.name, "Company created");

    Ok(ApiResponse::created(&serde_json::json!({
        "message": "Company created successfully",
        "company": company,
    })))
}
