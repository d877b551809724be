//! Elasticsearch gateway over the REST API
//!
//! # Responsibilities
//! - Build and send search, index, update, delete and aggregation requests
//! - Create the job index on first use
//! - Normalize hits and cluster health into gateway types
//!
//! # Design Decisions
//! - One attempt per call; the client-level timeout bounds every request
//! - Non-2xx responses count as failures, same as transport errors
//! - Index creation is memoized only on success, so a failed attempt is
//!   retried by the next caller

use async_trait::async_trait;
use chrono::Utc;
use jobboard_common::config::SearchConfig;
use jobboard_common::errors::{AppError, Result};
use jobboard_common::{FilterCriteria, Job, ScoredJob};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{GatewayResult, SearchUnavailable};
use crate::query;
use crate::types::{ClusterHealth, SearchResults};
use crate::SearchGateway;

/// Search gateway backed by an Elasticsearch cluster
pub struct ElasticsearchGateway {
    client: Client,
    base_url: String,
    index: String,
    username: String,
    password: String,
    index_ready: OnceCell<()>,
}

#[derive(Deserialize)]
struct EsSearchResponse {
    hits: EsHits,
    #[serde(default)]
    aggregations: Option<Value>,
}

#[derive(Deserialize)]
struct EsHits {
    #[serde(default)]
    total: Option<EsTotal>,
    #[serde(default)]
    hits: Vec<EsHit>,
}

#[derive(Deserialize)]
struct EsTotal {
    value: u64,
}

#[derive(Deserialize)]
struct EsHit {
    #[serde(rename = "_source")]
    source: Job,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
}

#[derive(Deserialize)]
struct EsClusterHealth {
    status: String,
    number_of_nodes: u32,
    active_shards: u32,
    relocating_shards: u32,
    initializing_shards: u32,
    unassigned_shards: u32,
}

impl From<EsClusterHealth> for ClusterHealth {
    fn from(raw: EsClusterHealth) -> Self {
        Self {
            status: raw.status,
            number_of_nodes: raw.number_of_nodes,
            active_shards: raw.active_shards,
            relocating_shards: raw.relocating_shards,
            initializing_shards: raw.initializing_shards,
            unassigned_shards: raw.unassigned_shards,
        }
    }
}

impl ElasticsearchGateway {
    /// Create a gateway from configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create search HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            index: config.index_name.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            index_ready: OnceCell::new(),
        })
    }

    /// Index holding job documents
    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.client.request(method, url);
        if self.username.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// Send a request; transport errors and non-2xx statuses both fail
    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| SearchUnavailable::new(operation, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SearchUnavailable::new(
            operation,
            format!("engine returned {}: {}", status, body),
        ))
    }

    async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> GatewayResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| SearchUnavailable::new(operation, format!("invalid response body: {}", e)))
    }

    async fn create_index_if_missing(&self) -> GatewayResult<()> {
        let exists = self
            .request(Method::HEAD, &self.index)
            .send()
            .await
            .map_err(|e| SearchUnavailable::new("ensure_index", e))?;

        match exists.status() {
            status if status.is_success() => {
                debug!(index = %self.index, "Search index already exists");
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(SearchUnavailable::new(
                    "ensure_index",
                    format!("index existence check returned {}", status),
                ));
            }
        }

        let response = self
            .request(Method::PUT, &self.index)
            .json(&query::index_schema())
            .send()
            .await
            .map_err(|e| SearchUnavailable::new("ensure_index", e))?;

        let status = response.status();
        if status.is_success() {
            info!(index = %self.index, "Created search index");
            return Ok(());
        }

        // Another process may have created it between the HEAD and the PUT
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            debug!(index = %self.index, "Search index created concurrently");
            return Ok(());
        }

        Err(SearchUnavailable::new(
            "ensure_index",
            format!("index creation returned {}: {}", status, body),
        ))
    }
}

#[async_trait]
impl SearchGateway for ElasticsearchGateway {
    async fn ensure_index(&self) -> GatewayResult<()> {
        self.index_ready
            .get_or_try_init(|| self.create_index_if_missing())
            .await
            .map(|_| ())
    }

    async fn search(&self, text: &str, filters: &FilterCriteria) -> GatewayResult<SearchResults> {
        self.ensure_index().await?;

        let body = query::search_body(text, filters);
        debug!(index = %self.index, query = %text, "Searching jobs");

        let response = self
            .send(
                "search",
                self.request(Method::POST, &format!("{}/_search", self.index)).json(&body),
            )
            .await?;
        let parsed: EsSearchResponse = Self::decode("search", response).await?;

        let hits: Vec<ScoredJob> = parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| ScoredJob {
                job: hit.source,
                score: hit.score,
            })
            .collect();
        let total = parsed
            .hits
            .total
            .map(|t| t.value)
            .unwrap_or(hits.len() as u64);

        Ok(SearchResults {
            hits,
            total,
            aggregations: parsed.aggregations,
        })
    }

    async fn index(&self, job: &Job) -> GatewayResult<Job> {
        self.ensure_index().await?;

        let mut document = job.clone();
        document.updated_at = Some(Utc::now());

        self.send(
            "index",
            self.request(Method::PUT, &format!("{}/_doc/{}", self.index, job.id))
                .json(&document),
        )
        .await?;

        debug!(job_id = job.id, "Indexed job");
        Ok(document)
    }

    async fn update(&self, id: u64, partial: Value) -> GatewayResult<Value> {
        self.ensure_index().await?;

        let mut document = match partial {
            Value::Object(fields) => fields,
            other => {
                return Err(SearchUnavailable::new(
                    "update",
                    format!("partial document must be an object, got {}", other),
                ))
            }
        };
        document.insert("updatedAt".to_string(), json!(Utc::now()));
        let document = Value::Object(document);

        self.send(
            "update",
            self.request(Method::POST, &format!("{}/_update/{}", self.index, id))
                .json(&json!({ "doc": document })),
        )
        .await?;

        debug!(job_id = id, "Updated job");
        Ok(document)
    }

    async fn delete(&self, id: u64) -> GatewayResult<()> {
        self.ensure_index().await?;

        self.send(
            "delete",
            self.request(Method::DELETE, &format!("{}/_doc/{}", self.index, id)),
        )
        .await?;

        debug!(job_id = id, "Deleted job");
        Ok(())
    }

    async fn aggregate(&self) -> GatewayResult<Value> {
        self.ensure_index().await?;

        let response = self
            .send(
                "aggregate",
                self.request(Method::POST, &format!("{}/_search", self.index))
                    .json(&query::aggregations_body()),
            )
            .await?;
        let parsed: Value = Self::decode("aggregate", response).await?;

        match parsed.get("aggregations") {
            Some(aggregations) => Ok(aggregations.clone()),
            None => {
                warn!(index = %self.index, "Aggregation response had no aggregations");
                Ok(json!({}))
            }
        }
    }

    async fn health_check(&self) -> GatewayResult<ClusterHealth> {
        let response = self
            .send("health_check", self.request(Method::GET, "_cluster/health"))
            .await?;
        let raw: EsClusterHealth = Self::decode("health_check", response).await?;
        Ok(raw.into())
    }
}
