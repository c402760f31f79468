use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::Label;
use crate::labels::{LabelStore, StoreError};

/// All labels, ordered by id
pub async fn list_labels(pool: &PgPool) -> Result<Vec<Label>, DatabaseError> {
    let labels = sqlx::query_as::<_, Label>("SELECT id, name, color FROM labels ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(labels)
}

pub async fn create_label(pool: &PgPool, name: &str, color: &str) -> Result<Label, DatabaseError> {
    sqlx::query_as::<_, Label>("INSERT INTO labels (name, color) VALUES ($1, $2) RETURNING id, name, color")
        .bind(name)
        .bind(color)
        .fetch_one(pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, &format!("label '{}'", name)))
}

/// Labels attached to an issue, ordered by label id
pub async fn labels_for_issue(pool: &PgPool, issue_id: i32) -> Result<Vec<Label>, DatabaseError> {
    let labels = sqlx::query_as::<_, Label>(
        "SELECT l.id, l.name, l.color
         FROM issue_labels il
         JOIN labels l ON l.id = il.label_id
         WHERE il.issue_id = $1
         ORDER BY l.id",
    )
    .bind(issue_id)
    .fetch_all(pool)
    .await?;
    Ok(labels)
}

/// Resolve label ids to labels, preserving the requested order.
/// Fails with `NotFound` naming the first id that does not exist.
pub async fn labels_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Label>, DatabaseError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let found = sqlx::query_as::<_, Label>("SELECT id, name, color FROM labels WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    ids.iter()
        .map(|id| {
            found
                .iter()
                .find(|l| l.id == *id)
                .cloned()
                .ok_or_else(|| DatabaseError::NotFound(format!("label {}", id)))
        })
        .collect()
}

/// Attach a label to an issue; attaching twice is a no-op
pub async fn add_issue_label(pool: &PgPool, issue_id: i32, label_id: i32) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO issue_labels (issue_id, label_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(issue_id)
        .bind(label_id)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, &format!("label {} on issue {}", label_id, issue_id)))?;
    Ok(())
}

/// Detach a label from an issue; detaching a missing label is a no-op
pub async fn remove_issue_label(pool: &PgPool, issue_id: i32, label_id: i32) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM issue_labels WHERE issue_id = $1 AND label_id = $2")
        .bind(issue_id)
        .bind(label_id)
        .execute(pool)
        .await?;
    debug!("Removed label {} from issue {} ({} rows)", label_id, issue_id, result.rows_affected());
    Ok(())
}

/// `LabelStore` backed directly by the database
#[derive(Clone)]
pub struct PgLabelStore {
    pool: PgPool,
}

impl PgLabelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => StoreError::NotFound(msg),
            e if e.is_unavailable() => StoreError::Unavailable(e.to_string()),
            e => StoreError::Rejected(e.to_string()),
        }
    }
}

#[async_trait]
impl LabelStore for PgLabelStore {
    async fn add_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        add_issue_label(&self.pool, issue_id, label_id).await.map_err(StoreError::from)
    }

    async fn remove_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        remove_issue_label(&self.pool, issue_id, label_id).await.map_err(StoreError::from)
    }
}
