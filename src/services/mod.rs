pub mod discussion_service;
pub mod issue_service;
pub mod label_service;
pub mod project_service;
pub mod slug;
pub mod workspace_service;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::pagination::{PageLinks, PaginationError};

pub use discussion_service::DiscussionService;
pub use issue_service::{IssueDetail, IssueService};
pub use label_service::LabelService;
pub use project_service::ProjectService;
pub use slug::slugify;
pub use workspace_service::{NewWorkspace, WorkspaceService};

/// Input rejected before touching the database
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        Self {
            message: format!("Invalid {}", field),
            field_errors,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

/// One page of a listing together with its navigation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub pagination: PageLinks,
}
