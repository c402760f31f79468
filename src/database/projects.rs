use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Project;

pub async fn get_project(pool: &PgPool, project_id: i32) -> Result<Project, DatabaseError> {
    sqlx::query_as::<_, Project>(
        "SELECT id, title, identifier, workspace_id, created_at FROM projects WHERE id = $1",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("project {}", project_id)))
}

/// Url slug of the workspace that owns a project
pub async fn workspace_url(pool: &PgPool, project_id: i32) -> Result<String, DatabaseError> {
    sqlx::query_scalar::<_, String>(
        "SELECT w.url FROM projects p JOIN workspaces w ON w.id = p.workspace_id WHERE p.id = $1",
    )
    .bind(project_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("project {}", project_id)))
}

pub async fn list_projects(pool: &PgPool, workspace_id: i32) -> Result<Vec<Project>, DatabaseError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT id, title, identifier, workspace_id, created_at
         FROM projects
         WHERE workspace_id = $1
         ORDER BY id",
    )
    .bind(workspace_id)
    .fetch_all(pool)
    .await?;
    Ok(projects)
}

pub async fn create_project(
    pool: &PgPool,
    workspace_id: i32,
    title: &str,
    identifier: &str,
) -> Result<Project, DatabaseError> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (title, identifier, workspace_id) VALUES ($1, $2, $3)
         RETURNING id, title, identifier, workspace_id, created_at",
    )
    .bind(title)
    .bind(identifier)
    .bind(workspace_id)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::from_write(e, &format!("project '{}'", title)))
}
