//! Connectivity probe handler

use axum::{extract::State, Json};

use super::{respond, Envelope};
use crate::AppState;
use vpcdemo_common::errors::Result;

/// Probe the configured target and return the diagnostic text as-is.
/// An unreachable target still answers 200; only a probe that could not
/// run at all is an error.
pub async fn test_connection(State(state): State<AppState>) -> Result<Json<Envelope<String>>> {
    let probe = &state.config.probe;

    let text = state.prober.probe(&probe.target, probe.port).await?;

    Ok(respond(text))
}
