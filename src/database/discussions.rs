use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Discussion;

pub async fn count_discussions(pool: &PgPool, project_id: i32) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discussions WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Newest first
pub async fn list_discussions(
    pool: &PgPool,
    project_id: i32,
    limit: i64,
    offset: i64,
) -> Result<Vec<Discussion>, DatabaseError> {
    let discussions = sqlx::query_as::<_, Discussion>(
        "SELECT id, title, content, project_id, workspace_id, author_id, is_resolved,
                view_count, like_count, created_at
         FROM discussions
         WHERE project_id = $1
         ORDER BY created_at DESC, id DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(project_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(discussions)
}

/// Insert a discussion in the project's workspace. An unknown author is `NotFound`.
pub async fn create_discussion(
    pool: &PgPool,
    project_id: i32,
    author_id: i32,
    title: &str,
    content: &str,
) -> Result<Discussion, DatabaseError> {
    sqlx::query_as::<_, Discussion>(
        "INSERT INTO discussions (title, content, project_id, workspace_id, author_id)
         SELECT $1, $2, p.id, p.workspace_id, $4 FROM projects p WHERE p.id = $3
         RETURNING id, title, content, project_id, workspace_id, author_id, is_resolved,
                   view_count, like_count, created_at",
    )
    .bind(title)
    .bind(content)
    .bind(project_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| DatabaseError::from_write(e, &format!("discussion by user {}", author_id)))?
    .ok_or_else(|| DatabaseError::NotFound(format!("project {}", project_id)))
}
