use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub title: String,
    /// Short issue-code prefix, e.g. "ACM" for "Acme Roadmap"
    pub identifier: String,
    pub workspace_id: i32,
    pub created_at: DateTime<Utc>,
}
