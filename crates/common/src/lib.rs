//! Job Board Common Library
//!
//! Shared code for the Job Board services including:
//! - Job and company record models
//! - The in-memory data store (system of record)
//! - Filter criteria derived from query parameters
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use filters::FilterCriteria;
pub use models::{Company, Job, ScoredJob};
pub use store::{CompanyStore, JobStore, MemoryStore, StoredRecord};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version reported by the public API description
pub const API_VERSION: &str = "1.0.0";
