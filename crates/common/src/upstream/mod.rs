//! Upstream HTTP passthrough
//!
//! One GET per call with the default client: no timeout override, no retry,
//! default redirect policy. The body is relayed whatever the upstream status.

use crate::errors::{AppError, Result};
use crate::metrics;
use std::time::Instant;
use tracing::{info, warn};

/// Client for the internal upstream service
#[derive(Debug, Clone, Default)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// GET `url` and return the body as text. Only transport failures are errors.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(start.elapsed().as_secs_f64(), None);
                warn!(url, error = %e, "Upstream request failed");
                return Err(AppError::Upstream(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;

        metrics::record_upstream(start.elapsed().as_secs_f64(), Some(status.as_u16()));
        info!(url, status = status.as_u16(), bytes = body.len(), "Upstream responded");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_relays_body_regardless_of_status() {
        let base = spawn_upstream(
            Router::new().route("/", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") })),
        )
        .await;

        let body = UpstreamClient::new().fetch(&base).await.unwrap();
        assert_eq!(body, "maintenance");
    }

    #[tokio::test]
    async fn test_transport_error_is_upstream_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = UpstreamClient::new()
            .fetch(&format!("http://{}", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
