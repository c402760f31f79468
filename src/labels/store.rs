use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a label store for a single add/remove call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (network down, database unavailable)
    #[error("label store unavailable: {0}")]
    Unavailable(String),

    /// The issue or label does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The store answered but refused the change
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Authoritative persistence for issue/label associations.
///
/// Both calls must be safe to repeat: adding an existing association or removing
/// a missing one succeeds without effect.
#[async_trait]
pub trait LabelStore: Send + Sync {
    async fn add_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError>;

    async fn remove_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: LabelStore + ?Sized> LabelStore for Arc<T> {
    async fn add_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        (**self).add_issue_label(issue_id, label_id).await
    }

    async fn remove_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        (**self).remove_issue_label(issue_id, label_id).await
    }
}
