//! Visit log
//!
//! Records one row per root-path request and lists the newest rows.
//! Writes are best-effort: a failed write is logged and otherwise ignored,
//! so the caller's response never depends on the database. Reads surface
//! failure as `AppError::RecentVisitsUnavailable`.

use crate::db::{NewVisit, VisitStore};
use crate::errors::{AppError, Result};
use crate::metrics;
use std::sync::Arc;
use tracing::{debug, error};

pub use crate::db::VisitRecord;

/// Visit recorder and lister over a `VisitStore`
#[derive(Clone)]
pub struct VisitLog {
    store: Arc<dyn VisitStore>,
}

impl VisitLog {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    /// Record a visit. Never fails.
    pub async fn record(&self, client_identifier: Option<&str>) {
        let visit = NewVisit::now(client_identifier);

        match self.store.insert_visit(&visit).await {
            Ok(()) => {
                metrics::record_visit(true);
                debug!(recorded_at = %visit.recorded_at, "Visit recorded");
            }
            Err(e) => {
                metrics::record_visit(false);
                error!(error = %e, "Failed to record visit");
            }
        }
    }

    /// Newest visits first, at most `limit`
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<VisitRecord>> {
        match self.store.recent_visits(limit).await {
            Ok(visits) => {
                metrics::record_listing(true);
                Ok(visits)
            }
            Err(e) => {
                metrics::record_listing(false);
                error!(error = %e, "Failed to list recent visits");
                Err(AppError::RecentVisitsUnavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Keeps inserted visits in memory; optionally fails every call
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<NewVisit>>,
        failing: bool,
    }

    #[async_trait]
    impl VisitStore for MemoryStore {
        async fn insert_visit(&self, visit: &NewVisit) -> Result<()> {
            if self.failing {
                return Err(AppError::DatabaseConnection {
                    message: "connection refused".into(),
                });
            }
            self.rows.lock().unwrap().push(visit.clone());
            Ok(())
        }

        async fn recent_visits(&self, limit: i64) -> Result<Vec<VisitRecord>> {
            if self.failing {
                return Err(AppError::DatabaseConnection {
                    message: "connection refused".into(),
                });
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .rev()
                .take(limit as usize)
                .map(|v| VisitRecord::from_columns(
                    Some(v.recorded_at.to_string()),
                    v.user_agent.clone(),
                ))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_record_passes_identifier_verbatim() {
        let store = Arc::new(MemoryStore::default());
        let log = VisitLog::new(store.clone());

        log.record(Some("curl/8.0'); DROP TABLE access; --")).await;
        log.record(None).await;

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_agent.as_deref(), Some("curl/8.0'); DROP TABLE access; --"));
        assert_eq!(rows[1].user_agent, None);
    }

    #[tokio::test]
    async fn test_record_swallows_store_failure() {
        let log = VisitLog::new(Arc::new(MemoryStore {
            failing: true,
            ..Default::default()
        }));

        // Returns normally
        log.record(Some("agent")).await;
    }

    #[tokio::test]
    async fn test_list_recent_maps_failure_to_fixed_error() {
        let log = VisitLog::new(Arc::new(MemoryStore {
            failing: true,
            ..Default::default()
        }));

        let err = log.list_recent(10).await.unwrap_err();
        assert!(matches!(err, AppError::RecentVisitsUnavailable));
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let log = VisitLog::new(Arc::new(MemoryStore::default()));
        for agent in ["a", "b", "c"] {
            log.record(Some(agent)).await;
        }

        let visits = tokio_test::assert_ok!(log.list_recent(2).await);
        let agents: Vec<_> = visits.iter().map(|v| v.user_agent.as_str()).collect();
        assert_eq!(agents, vec!["c", "b"]);
    }
}
