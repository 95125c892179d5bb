//! Visit log handlers

use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
    Json,
};

use super::{respond, Envelope};
use crate::AppState;
use vpcdemo_common::{errors::Result, visits::VisitRecord, RECENT_VISITS_LIMIT};

/// Record the caller's visit. Always answers "Registered request", even
/// when the write fails.
pub async fn register_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Envelope<&'static str>> {
    let user_agent = headers
        .get(USER_AGENT)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    state.visits.record(user_agent.as_deref()).await;

    respond("Registered request")
}

/// List the most recent visits, newest first
pub async fn recent_visits(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<VisitRecord>>>> {
    let visits = state.visits.list_recent(RECENT_VISITS_LIMIT).await?;

    Ok(respond(visits))
}
