use axum::extract::{rejection::JsonRejection, Json, Path};
use serde::Deserialize;

use crate::database::models::Project;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ProjectService, WorkspaceService};

use super::json_body;

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub title: String,
}

/// GET /api/workspaces/:url/projects
pub async fn workspace_list(Path(url): Path<String>) -> ApiResult<Vec<Project>> {
    let service = WorkspaceService::new().await?;
    Ok(ApiResponse::success(service.projects(&url).await?))
}

/// POST /api/workspaces/:url/projects - create `{title}`
pub async fn create(
    Path(url): Path<String>,
    payload: Result<Json<CreateProject>, JsonRejection>,
) -> ApiResult<Project> {
    let body = json_body(payload)?;
    let service = ProjectService::new().await?;
    Ok(ApiResponse::created(service.create(&url, &body.title).await?))
}
