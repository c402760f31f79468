use sqlx::PgPool;
use tracing::{info, warn};

use crate::database::labels;
use crate::database::{DatabaseManager, PgLabelStore};
use crate::labels::{FailurePolicy, Label, LabelAssignmentSync, SyncOutcome};
use crate::services::{ServiceError, ValidationError};

pub const LABEL_COLORS: &[&str] = &["gray", "red", "orange", "yellow", "green", "blue", "purple", "pink"];

pub struct LabelService {
    pool: PgPool,
}

impl LabelService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn catalog(&self) -> Result<Vec<Label>, ServiceError> {
        Ok(labels::list_labels(&self.pool).await?)
    }

    pub async fn create(&self, name: &str, color: &str) -> Result<Label, ServiceError> {
        let name = validate_label(name, color)?;
        let label = labels::create_label(&self.pool, name, color).await?;
        info!("Created label {} ({})", label.name, label.id);
        Ok(label)
    }

    pub async fn for_issue(&self, issue_id: i32) -> Result<Vec<Label>, ServiceError> {
        // 404 for a missing issue rather than an empty list
        crate::database::issues::get_issue(&self.pool, issue_id).await?;
        Ok(labels::labels_for_issue(&self.pool, issue_id).await?)
    }

    pub async fn attach(&self, issue_id: i32, label_id: i32) -> Result<Vec<Label>, ServiceError> {
        labels::add_issue_label(&self.pool, issue_id, label_id).await?;
        Ok(labels::labels_for_issue(&self.pool, issue_id).await?)
    }

    pub async fn detach(&self, issue_id: i32, label_id: i32) -> Result<Vec<Label>, ServiceError> {
        labels::remove_issue_label(&self.pool, issue_id, label_id).await?;
        Ok(labels::labels_for_issue(&self.pool, issue_id).await?)
    }

    /// Replace an issue's labels with `label_ids`, issuing only the adds and removes
    /// that differ from what is stored
    pub async fn replace(&self, issue_id: i32, label_ids: &[i32]) -> Result<SyncOutcome, ServiceError> {
        let current = self.for_issue(issue_id).await?;
        let next = labels::labels_by_ids(&self.pool, label_ids).await?;

        let sync = LabelAssignmentSync::new(issue_id, current, PgLabelStore::new(self.pool.clone()))
            .with_policy(FailurePolicy::from_config());
        let outcome = sync.on_change(next).await;

        if !outcome.is_synced() {
            warn!(
                "Label replace on issue {} finished with {} failed call(s)",
                issue_id,
                outcome.failures.len()
            );
        }
        Ok(outcome)
    }
}

fn validate_label<'a>(name: &'a str, color: &str) -> Result<&'a str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::field("name", "Label name is required"));
    }
    if !LABEL_COLORS.contains(&color) {
        return Err(ValidationError::field(
            "color",
            format!("Unknown color '{}', expected one of: {}", color, LABEL_COLORS.join(", ")),
        ));
    }
    Ok(name)
}
