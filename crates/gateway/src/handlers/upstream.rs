//! Upstream passthrough handler

use axum::{extract::State, Json};

use super::{respond, Envelope};
use crate::AppState;
use vpcdemo_common::errors::{AppError, Result};

/// Relay the internal service's body. The upstream status is not relayed.
pub async fn ecs_private_service(State(state): State<AppState>) -> Result<Json<Envelope<String>>> {
    let url = state
        .config
        .upstream
        .url
        .as_deref()
        .ok_or_else(|| AppError::Configuration {
            message: "ECSPRIVATESERVICE is not set".to_string(),
        })?;

    let body = state.upstream.fetch(url).await?;

    Ok(respond(body))
}
