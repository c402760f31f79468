use serde::Serialize;
use sqlx::PgPool;

use crate::database::models::{Project, Workspace, WorkspaceMember};
use crate::database::{projects, workspaces, DatabaseError, DatabaseManager};
use crate::services::{slugify, ServiceError, ValidationError};

const MAX_NAME_LEN: usize = 60;

/// A freshly created workspace and its owner's admin membership
#[derive(Debug, Clone, Serialize)]
pub struct NewWorkspace {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub owner: WorkspaceMember,
}

pub struct WorkspaceService {
    pool: PgPool,
}

impl WorkspaceService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create a workspace whose url is the slug of its name
    pub async fn create(&self, name: &str, owner_id: i32) -> Result<NewWorkspace, ServiceError> {
        let (name, url) = validate_workspace_name(name)?;
        let (workspace, owner) = workspaces::create_workspace(&self.pool, name, &url, owner_id).await?;
        Ok(NewWorkspace { workspace, owner })
    }

    pub async fn get(&self, url: &str) -> Result<Workspace, ServiceError> {
        workspaces::find_by_url(&self.pool, url)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("workspace '{}'", url)).into())
    }

    pub async fn projects(&self, url: &str) -> Result<Vec<Project>, ServiceError> {
        let workspace = self.get(url).await?;
        Ok(projects::list_projects(&self.pool, workspace.id).await?)
    }
}

/// Trimmed name and the url slug derived from it
fn validate_workspace_name(name: &str) -> Result<(&str, String), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::field("name", "Workspace name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::field(
            "name",
            format!("Workspace name must be at most {} characters", MAX_NAME_LEN),
        ));
    }
    let url = slugify(name);
    if url.is_empty() {
        return Err(ValidationError::field("name", "Workspace name must contain a letter or digit"));
    }
    Ok((name, url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_url_from_name() {
        assert_eq!(
            validate_workspace_name("  Acme Corp ").unwrap(),
            ("Acme Corp", "acme-corp".to_string())
        );
    }

    #[test]
    fn rejects_unusable_names() {
        assert!(validate_workspace_name("").is_err());
        assert!(validate_workspace_name("   ").is_err());
        assert!(validate_workspace_name("???").is_err());
        assert!(validate_workspace_name(&"x".repeat(61)).is_err());
        assert!(validate_workspace_name(&"x".repeat(60)).is_ok());
    }
}
