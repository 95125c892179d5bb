//! Shared utilities for router integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use vpcdemo_common::{
    config::AppConfig,
    db::{NewVisit, VisitRecord, VisitStore},
    errors::{AppError, Result},
};
use vpcdemo_gateway::{create_router, AppState};

/// In-memory visit store; newest rows are listed first
#[derive(Default)]
pub struct MemoryStore {
    pub rows: Mutex<Vec<NewVisit>>,
}

#[async_trait]
impl VisitStore for MemoryStore {
    async fn insert_visit(&self, visit: &NewVisit) -> Result<()> {
        self.rows.lock().unwrap().push(visit.clone());
        Ok(())
    }

    async fn recent_visits(&self, limit: i64) -> Result<Vec<VisitRecord>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .take(limit as usize)
            .map(|v| VisitRecord::from_columns(Some(v.recorded_at.to_string()), v.user_agent.clone()))
            .collect())
    }
}

/// Store whose database is never reachable
pub struct UnreachableStore;

#[async_trait]
impl VisitStore for UnreachableStore {
    async fn insert_visit(&self, _visit: &NewVisit) -> Result<()> {
        Err(AppError::DatabaseConnection {
            message: "Failed to connect to localhost: connection refused".into(),
        })
    }

    async fn recent_visits(&self, _limit: i64) -> Result<Vec<VisitRecord>> {
        Err(AppError::DatabaseConnection {
            message: "Failed to connect to localhost: connection refused".into(),
        })
    }
}

/// Build the router around the given config and store
pub fn app_with(config: AppConfig, store: Arc<dyn VisitStore>) -> Router {
    create_router(AppState::new(Arc::new(config), store))
}

/// Issue a GET and decode the JSON body
pub async fn get_json(app: &Router, uri: &str, user_agent: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(agent) = user_agent {
        request = request.header("user-agent", agent);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = response.status();
    assert_eq!(
        response.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );

    let body = to_bytes(response.into_body(), 1024 * 1024).await.expect("failed to read body");
    let json = serde_json::from_slice(&body).expect("body is not JSON");
    (status, json)
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A local port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
