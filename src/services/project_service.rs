use sqlx::PgPool;
use tracing::info;

use crate::database::models::Project;
use crate::database::{projects, DatabaseManager};
use crate::services::{ServiceError, ValidationError, WorkspaceService};

const TITLE_MIN: usize = 2;
const TITLE_MAX: usize = 40;

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn create(&self, workspace_url: &str, title: &str) -> Result<Project, ServiceError> {
        let title = validate_title(title)?;
        let workspace = WorkspaceService::new().await?.get(workspace_url).await?;

        let project = projects::create_project(&self.pool, workspace.id, title, &identifier_for(title)).await?;
        info!("Created project {} ({}) in {}", project.title, project.identifier, workspace.url);
        Ok(project)
    }
}

fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    let len = title.chars().count();
    if len < TITLE_MIN {
        return Err(ValidationError::field("title", "Project name is required."));
    }
    if len > TITLE_MAX {
        return Err(ValidationError::field(
            "title",
            format!("Project name must be at most {} characters", TITLE_MAX),
        ));
    }
    Ok(title)
}

/// Issue-code prefix: the first three characters of the title, upper-cased
pub fn identifier_for(title: &str) -> String {
    title.chars().take(3).collect::<String>().to_uppercase()
}
