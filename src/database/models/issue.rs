use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::{Priority, Status};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Issue {
    pub id: i32,
    pub title: String,
    /// Markdown body
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub project_id: i32,
    pub owner_id: i32,
    pub assigned_user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape for issue listings, without the description body
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IssueSummary {
    pub id: i32,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub assigned_user_id: Option<i32>,
    pub updated_at: DateTime<Utc>,
}
