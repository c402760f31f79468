use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Issue, IssueSummary};
use crate::types::Status;

const ISSUE_COLUMNS: &str = "id, title, description, status, priority, project_id, owner_id, \
                             assigned_user_id, created_at, updated_at";

pub async fn get_issue(pool: &PgPool, issue_id: i32) -> Result<Issue, DatabaseError> {
    sqlx::query_as::<_, Issue>(&format!("SELECT {} FROM issues WHERE id = $1", ISSUE_COLUMNS))
        .bind(issue_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("issue {}", issue_id)))
}

pub async fn count_issues(pool: &PgPool, project_id: i32) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM issues WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn list_issues(
    pool: &PgPool,
    project_id: i32,
    limit: i64,
    offset: i64,
) -> Result<Vec<IssueSummary>, DatabaseError> {
    let issues = sqlx::query_as::<_, IssueSummary>(
        "SELECT id, title, status, priority, assigned_user_id, updated_at
         FROM issues
         WHERE project_id = $1
         ORDER BY id
         LIMIT $2 OFFSET $3",
    )
    .bind(project_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(issues)
}

pub async fn update_status(pool: &PgPool, issue_id: i32, status: Status) -> Result<Issue, DatabaseError> {
    sqlx::query_as::<_, Issue>(&format!(
        "UPDATE issues SET status = $2, updated_at = now() WHERE id = $1 RETURNING {}",
        ISSUE_COLUMNS
    ))
    .bind(issue_id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("issue {}", issue_id)))
}
