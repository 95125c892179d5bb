//! PostgreSQL gateway for the visit log
//!
//! Every call opens a fresh connection and closes it before returning,
//! whether the statement succeeded or not. No pooling.

use crate::config::DatabaseConfig;
use crate::db::models::{NewVisit, VisitRecord};
use crate::db::{DatabaseCredentials, VisitStore};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, warn};

/// Visit store backed by PostgreSQL
#[derive(Clone)]
pub struct PgVisitStore {
    options: PgConnectOptions,
    table: String,
}

impl PgVisitStore {
    /// Create a store for the configured database using the resolved credentials
    pub fn new(config: &DatabaseConfig, credentials: &DatabaseCredentials) -> Self {
        let mut options = PgConnectOptions::new().database(&config.name);

        if let Some(host) = config.host.as_deref() {
            options = options.host(host);
        }
        if !credentials.username.is_empty() {
            options = options.username(&credentials.username);
        }
        if !credentials.password.is_empty() {
            options = options.password(&credentials.password);
        }

        Self {
            options,
            table: config.table.clone(),
        }
    }

    /// Options used for every connection
    pub fn connect_options(&self) -> &PgConnectOptions {
        &self.options
    }

    /// Table holding visit records
    pub fn table(&self) -> &str {
        &self.table
    }

    async fn connect(&self) -> Result<PgConnection> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect to {}: {}", self.options.get_host(), e),
            })
    }

    async fn insert_on(&self, conn: &mut PgConnection, visit: &NewVisit) -> Result<()> {
        let sql = insert_statement(&self.table);

        let mut tx = conn.begin().await?;
        sqlx::query(&sql)
            .bind(visit.recorded_at)
            .bind(visit.user_agent.as_deref())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn select_recent_on(&self, conn: &mut PgConnection, limit: i64) -> Result<Vec<VisitRecord>> {
        let sql = select_recent_statement(&self.table);

        let rows = sqlx::query_as::<_, (Option<String>, Option<String>)>(&sql)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(timestamp, user_agent)| VisitRecord::from_columns(timestamp, user_agent))
            .collect())
    }
}

#[async_trait]
impl VisitStore for PgVisitStore {
    async fn insert_visit(&self, visit: &NewVisit) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = self.insert_on(&mut conn, visit).await;
        release(conn).await;

        if result.is_ok() {
            debug!(table = %self.table, "Visit committed");
        }
        result
    }

    async fn recent_visits(&self, limit: i64) -> Result<Vec<VisitRecord>> {
        let mut conn = self.connect().await?;
        let result = self.select_recent_on(&mut conn, limit).await;
        release(conn).await;
        result
    }
}

/// Close a connection, logging instead of failing the caller
async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection cleanly");
    }
}

/// Insert statement; client values are only ever bound as `$1`/`$2`
pub(crate) fn insert_statement(table: &str) -> String {
    format!(
        "INSERT INTO {} (last_update, user_agent) VALUES ($1, $2)",
        table
    )
}

/// Newest-first listing, bounded by `$1`
pub(crate) fn select_recent_statement(table: &str) -> String {
    format!(
        "SELECT last_update::text, user_agent::text FROM {} ORDER BY last_update DESC LIMIT $1",
        table
    )
}
