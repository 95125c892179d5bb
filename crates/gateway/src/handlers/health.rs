//! Health check handler

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

/// Liveness probe - always healthy if the server is running, whatever
/// the state of the database or upstream
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "Healthy" })
}
