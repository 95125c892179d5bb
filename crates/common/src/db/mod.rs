//! Database layer for the visit log
//!
//! Provides:
//! - Visit models
//! - The `VisitStore` seam used by the visit log
//! - A PostgreSQL gateway opening one connection per call
//! - Database credentials, resolved once at startup

pub mod models;
mod repository;

pub use models::{NewVisit, VisitRecord};
pub use repository::PgVisitStore;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use async_trait::async_trait;
use std::fmt;

/// Storage operations needed by the visit log
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Insert one visit and commit it
    async fn insert_visit(&self, visit: &NewVisit) -> Result<()>;

    /// Most recent visits, newest first, at most `limit` rows
    async fn recent_visits(&self, limit: i64) -> Result<Vec<VisitRecord>>;
}

/// Username and password used for every database connection.
///
/// Built once at startup, either from `DB_USER`/`DB_PASS` or from the
/// secret store, and never changed afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

impl DatabaseCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Credentials taken straight from configuration
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            username: config.user.clone().unwrap_or_default(),
            password: config.password.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
