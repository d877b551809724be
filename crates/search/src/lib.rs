//! Job Board Search Gateway
//!
//! Wraps the external full-text search engine behind a single contract:
//! - Relevance search with exact-match filters and pagination
//! - Best-effort indexing of listings created through the API
//! - Term aggregations over companies, locations, types and skills
//! - Cluster health probing
//! - Lazy, idempotent index creation
//!
//! Every failure surfaces as [`SearchUnavailable`]; callers decide whether to
//! fall back to the data store or report a degraded status.

mod error;
mod types;

pub mod elasticsearch;
pub mod mock;
pub mod query;

pub use elasticsearch::ElasticsearchGateway;
pub use error::{GatewayResult, SearchUnavailable};
pub use mock::MockGateway;
pub use types::{ClusterHealth, SearchResults};

use async_trait::async_trait;
use jobboard_common::{FilterCriteria, Job};
use serde_json::Value;

/// Contract the request handlers rely on
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Create the backing index if it does not exist yet
    async fn ensure_index(&self) -> GatewayResult<()>;

    /// Relevance search; empty `text` matches every document
    async fn search(&self, text: &str, filters: &FilterCriteria) -> GatewayResult<SearchResults>;

    /// Index (or replace) a job document, returning what was written
    async fn index(&self, job: &Job) -> GatewayResult<Job>;

    /// Apply a partial update to an indexed job
    async fn update(&self, id: u64, partial: Value) -> GatewayResult<Value>;

    /// Remove a job from the index
    async fn delete(&self, id: u64) -> GatewayResult<()>;

    /// Bucketed counts per field across the whole index
    async fn aggregate(&self) -> GatewayResult<Value>;

    /// Probe the engine's own health
    async fn health_check(&self) -> GatewayResult<ClusterHealth>;

    /// Source label reported in response envelopes
    fn source_name(&self) -> &'static str {
        "elasticsearch"
    }
}
