use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{User, Workspace, WorkspaceMember};
use crate::types::WorkspaceRole;

pub async fn find_by_url(pool: &PgPool, url: &str) -> Result<Option<Workspace>, DatabaseError> {
    let workspace = sqlx::query_as::<_, Workspace>(
        "SELECT id, name, url, owner_id, created_at FROM workspaces WHERE url = $1",
    )
    .bind(url)
    .fetch_optional(pool)
    .await?;
    Ok(workspace)
}

/// Create a workspace, enrol its owner as an admin and make it the owner's last workspace
pub async fn create_workspace(
    pool: &PgPool,
    name: &str,
    url: &str,
    owner_id: i32,
) -> Result<(Workspace, WorkspaceMember), DatabaseError> {
    let mut tx = pool.begin().await?;

    let owner = sqlx::query_as::<_, User>(
        "SELECT id, name, email, image, last_workspace_url, created_at FROM users WHERE id = $1",
    )
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("user {}", owner_id)))?;

    let workspace = sqlx::query_as::<_, Workspace>(
        "INSERT INTO workspaces (name, url, owner_id) VALUES ($1, $2, $3)
         RETURNING id, name, url, owner_id, created_at",
    )
    .bind(name)
    .bind(url)
    .bind(owner.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| DatabaseError::from_write(e, &format!("workspace '{}'", url)))?;

    let member = sqlx::query_as::<_, WorkspaceMember>(
        "INSERT INTO workspace_members (workspace_id, user_id, role) VALUES ($1, $2, $3)
         RETURNING workspace_id, user_id, role",
    )
    .bind(workspace.id)
    .bind(owner.id)
    .bind(WorkspaceRole::Admin)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET last_workspace_url = $2 WHERE id = $1")
        .bind(owner.id)
        .bind(&workspace.url)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Created workspace {} ({}) for {} <{}>", workspace.name, workspace.url, owner.name, owner.email);
    Ok((workspace, member))
}
