//! Job Board API
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Request routing through the route table
//! - Job search with in-memory fallback
//! - Job and company creation
//! - Observability (logging, metrics, request ids)

mod handlers;
mod request;
mod response;
mod router;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use jobboard_common::{
    config::AppConfig,
    errors::AppError,
    metrics::{self, LATENCY_BUCKETS},
    Company, CompanyStore, Job, JobStore, MemoryStore,
};
use jobboard_search::{ElasticsearchGateway, SearchGateway};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::any::Any;
use std::collections::HashMap;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::handlers::Endpoint;
use crate::request::RequestDescriptor;
use crate::response::ApiResponse;
use crate::router::RouteTable;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobStore>,
    pub companies: Arc<CompanyStore>,
    pub search: Arc<dyn SearchGateway>,
    pub routes: Arc<RouteTable<Endpoint>>,
}

impl AppState {
    pub fn new(config: &AppConfig, search: Arc<dyn SearchGateway>) -> jobboard_common::Result<Self> {
        let (jobs, companies) = if config.store.seed_sample_data {
            (
                MemoryStore::with_records(Job::samples()),
                MemoryStore::with_records(Company::samples()),
            )
        } else {
            (MemoryStore::new(), MemoryStore::new())
        };

        Ok(Self {
            jobs: Arc::new(jobs),
            companies: Arc::new(companies),
            search,
            routes: Arc::new(handlers::route_table()?),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);
    info!(
        service = %config.observability.service_name,
        "Starting Job Board API v{}",
        jobboard_common::VERSION
    );

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        install_metrics_exporter(config.observability.metrics_port)?;
    }
    metrics::register_metrics();

    // Search engine client
    let search: Arc<dyn SearchGateway> = Arc::new(ElasticsearchGateway::new(&config.search)?);
    if config.search.initialize_index {
        let search = search.clone();
        tokio::spawn(async move {
            if let Err(e) = search.ensure_index().await {
                warn!(error = %e, "Search index initialization failed, continuing in degraded mode");
            }
        });
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    // Create app state
    let state = AppState::new(&config, search)?;
    info!(routes = state.routes.len(), jobs = state.jobs.len(), "Application state ready");

    // Build the router
    let app = create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // In-flight requests get the configured grace period after a signal
    let grace_period = config.shutdown_timeout();
    let draining = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let draining = draining.clone();
        async move {
            shutdown_signal().await;
            draining.notify_one();
        }
    });

    tokio::select! {
        result = server.into_future() => result?,
        _ = async {
            draining.notified().await;
            tokio::time::sleep(grace_period).await;
        } => warn!(?grace_period, "Shutdown grace period elapsed, dropping open connections"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn install_metrics_exporter(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from(([0, 0, 0, 0], port)))
        .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), LATENCY_BUCKETS)?
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!(port, "Prometheus exporter listening");
    Ok(())
}

/// Create the main application router.
///
/// There are no axum routes: every request goes through the fallback
/// into the route table, so route misses get the same envelope as
/// everything else.
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .fallback(handle_request)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors),
        )
        .with_state(state)
}

async fn handle_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    query: Result<Query<HashMap<String, String>>, axum::extract::rejection::QueryRejection>,
    body: Bytes,
) -> ApiResponse {
    let query = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed query string");
            HashMap::new()
        }
    };

    let request = RequestDescriptor::new(method.as_str(), uri.path())
        .with_query(query)
        .with_body(String::from_utf8_lossy(&body).into_owned());

    handlers::dispatch(&state, request).await
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    error!(panic = %detail, "Handler panicked");
    ApiResponse::from(AppError::Internal { message: detail }).into_response()
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
