use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::WorkspaceRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    pub id: i32,
    pub name: String,
    /// URL slug, unique across workspaces
    pub url: String,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkspaceMember {
    pub workspace_id: i32,
    pub user_id: i32,
    pub role: WorkspaceRole,
}
