//! VPC Demo Gateway
//!
//! HTTP surface of the demo service:
//! - `/health` liveness
//! - `/` visit registration and `/recent-visits` listing
//! - `/test-connection` TCP reachability probe
//! - `/ecs-private-service` upstream passthrough

pub mod handlers;
pub mod middleware;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use vpcdemo_common::{
    config::AppConfig,
    db::VisitStore,
    probe::ConnectivityProber,
    upstream::UpstreamClient,
    visits::VisitLog,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub visits: VisitLog,
    pub prober: ConnectivityProber,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Build state around a visit store; the prober and upstream client come from config
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn VisitStore>) -> Self {
        Self {
            prober: ConnectivityProber::new(config.probe_timeout()),
            upstream: UpstreamClient::new(),
            visits: VisitLog::new(store),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Request ID is set outermost so the propagate layer sees it
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    Router::new()
        .route("/", get(handlers::visits::register_visit))
        .route("/health", get(handlers::health::health))
        .route("/recent-visits", get(handlers::visits::recent_visits))
        .route("/test-connection", get(handlers::connectivity::test_connection))
        .route("/ecs-private-service", get(handlers::upstream::ecs_private_service))
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}
