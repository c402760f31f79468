use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Discussion {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub project_id: i32,
    pub workspace_id: i32,
    pub author_id: i32,
    pub is_resolved: bool,
    pub view_count: i32,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
}
