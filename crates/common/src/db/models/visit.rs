//! Visit record model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A visit about to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    /// Local wall-clock time taken by the service, not the database
    pub recorded_at: NaiveDateTime,

    /// Verbatim `User-Agent` value; `None` when the header was absent
    pub user_agent: Option<String>,
}

impl NewVisit {
    /// Stamp a visit with the current local time
    pub fn now(user_agent: Option<&str>) -> Self {
        Self {
            recorded_at: chrono::Local::now().naive_local(),
            user_agent: user_agent.map(str::to_owned),
        }
    }
}

/// A visit as listed by `/recent-visits`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub timestamp: String,
    pub user_agent: String,
}

impl VisitRecord {
    /// Build from nullable text columns; NULL renders as an empty string
    pub fn from_columns(timestamp: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            timestamp: timestamp.unwrap_or_default(),
            user_agent: user_agent.unwrap_or_default(),
        }
    }
}
