//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with latency histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Job Board metrics
pub const METRICS_PREFIX: &str = "jobboard";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s - search timeout
    10.00,  // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Search metrics
    describe_counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of job searches by backing source"
    );

    describe_histogram!(
        format!("{}_search_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Job search latency in seconds"
    );

    describe_counter!(
        format!("{}_search_fallbacks_total", METRICS_PREFIX),
        Unit::Count,
        "Search engine failures absorbed by fallback or degraded responses"
    );

    // Index metrics
    describe_counter!(
        format!("{}_index_writes_total", METRICS_PREFIX),
        Unit::Count,
        "Best-effort writes mirrored to the search engine"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    route: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, route: &str) -> Self {
        Self {
            start: Instant::now(),
            route: route.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "route" => self.route.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "route" => self.route
        )
        .record(duration);
    }
}

/// Record a completed search and the source that served it
pub fn record_search(duration_secs: f64, source: &str) {
    counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        "source" => source.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_search_duration_seconds", METRICS_PREFIX),
        "source" => source.to_string()
    )
    .record(duration_secs);
}

/// Record a search engine failure that was absorbed locally
pub fn record_fallback(operation: &str) {
    counter!(
        format!("{}_search_fallbacks_total", METRICS_PREFIX),
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record the outcome of a mirrored index write
pub fn record_index_write(success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_index_writes_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);
}
