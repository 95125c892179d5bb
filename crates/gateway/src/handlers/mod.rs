//! API handlers module
//!
//! Every body is a JSON envelope: `{"Response": ...}`, or `{"Status": ...}`
//! for the health check.

pub mod connectivity;
pub mod health;
pub mod upstream;
pub mod visits;

use axum::Json;
use serde::Serialize;

/// `{"Response": <value>}` wrapper used by every non-health endpoint
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "Response")]
    pub response: T,
}

/// Wrap a value in the response envelope
pub fn respond<T: Serialize>(response: T) -> Json<Envelope<T>> {
    Json(Envelope { response })
}
