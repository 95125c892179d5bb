//! VPC Demo Service
//!
//! Startup order:
//! - Configuration from the environment (and `.env`, if present)
//! - Logging and optional Prometheus exporter
//! - Database credentials, from the secret store in managed-secret mode
//! - HTTP listener on `0.0.0.0:PORT`

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vpcdemo_common::{
    config::{AppConfig, ObservabilityConfig},
    db::PgVisitStore,
    metrics::{self, LATENCY_BUCKETS},
    secrets::{startup_credentials, AwsSecretsManager, SecretStore},
};
use vpcdemo_gateway::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting VPC demo service v{}", vpcdemo_common::VERSION);

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .set_buckets(LATENCY_BUCKETS)?
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Metrics exporter listening on {}", addr);
    }
    metrics::register_metrics();

    // Resolve database credentials before any connection is made
    let secret_store = if config.secrets.managed {
        info!("Managed-secret mode enabled, fetching database credentials");
        Some(AwsSecretsManager::from_env().await)
    } else {
        None
    };

    let credentials = startup_credentials(
        &config,
        secret_store.as_ref().map(|s| s as &dyn SecretStore),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to resolve database credentials");
        e
    })?;

    let store = Arc::new(PgVisitStore::new(&config.database, &credentials));
    info!(
        table = %config.database.table,
        database = %config.database.name,
        "Visit log configured"
    );

    let config = Arc::new(config);
    let state = AppState::new(config.clone(), store);

    // Build the router
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Structured logging; `RUST_LOG` wins over `LOG_LEVEL`
fn init_tracing(observability: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
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
