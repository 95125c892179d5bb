//! VPC Demo Common Library
//!
//! Shared code for the demo service including:
//! - Environment-driven configuration
//! - Database credentials and secret resolution
//! - The visit log and its PostgreSQL gateway
//! - TCP connectivity probing
//! - Upstream HTTP passthrough
//! - Error types and metrics descriptions

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod probe;
pub mod secrets;
pub mod upstream;
pub mod visits;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::db::{DatabaseCredentials, PgVisitStore, VisitStore};
pub use crate::errors::{AppError, Result};
pub use crate::visits::{VisitLog, VisitRecord};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of visits returned by the recent-visits listing
pub const RECENT_VISITS_LIMIT: i64 = 10;
