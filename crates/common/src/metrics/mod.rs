//! Metrics and observability utilities
//!
//! Metric descriptions and recording helpers on the `metrics` facade.
//! Nothing is exported unless the binary installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all service metrics
pub const METRICS_PREFIX: &str = "vpcdemo";

/// Histogram buckets for request and downstream latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.000,  // 2s - probe timeout
    2.500,  // 2.5s
    5.000,  // 5s
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

    // Visit log metrics
    describe_counter!(
        format!("{}_visits_recorded_total", METRICS_PREFIX),
        Unit::Count,
        "Visit writes by outcome"
    );

    describe_counter!(
        format!("{}_visit_listings_total", METRICS_PREFIX),
        Unit::Count,
        "Recent-visit listings by outcome"
    );

    // Probe metrics
    describe_counter!(
        format!("{}_probes_total", METRICS_PREFIX),
        Unit::Count,
        "Connectivity probes by outcome"
    );

    describe_histogram!(
        format!("{}_probe_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Connectivity probe latency in seconds"
    );

    // Upstream metrics
    describe_counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Upstream passthrough requests by status"
    );

    describe_histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Upstream passthrough latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

fn outcome(success: bool) -> &'static str {
    if success { "success" } else { "error" }
}

/// Helper to record a visit write
pub fn record_visit(success: bool) {
    counter!(
        format!("{}_visits_recorded_total", METRICS_PREFIX),
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Helper to record a visit listing
pub fn record_listing(success: bool) {
    counter!(
        format!("{}_visit_listings_total", METRICS_PREFIX),
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Helper to record a probe run; `result` is "reachable", "unreachable" or "error"
pub fn record_probe(duration_secs: f64, result: &'static str) {
    counter!(
        format!("{}_probes_total", METRICS_PREFIX),
        "result" => result
    )
    .increment(1);

    histogram!(format!("{}_probe_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record an upstream call; `None` status means a transport error
pub fn record_upstream(duration_secs: f64, status: Option<u16>) {
    let status = status.map_or_else(|| "transport_error".to_string(), |s| s.to_string());

    counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        "status" => status
    )
    .increment(1);

    histogram!(format!("{}_upstream_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}
