use axum::extract::{rejection::JsonRejection, Json, Path};
use serde::Deserialize;

use crate::database::models::Workspace;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{NewWorkspace, WorkspaceService};

use super::json_body;

#[derive(Debug, Deserialize)]
pub struct CreateWorkspace {
    pub name: String,
    pub owner_id: i32,
}

/// POST /api/workspaces - create `{name, owner_id}`; the url is derived from the name
pub async fn create(payload: Result<Json<CreateWorkspace>, JsonRejection>) -> ApiResult<NewWorkspace> {
    let body = json_body(payload)?;
    let service = WorkspaceService::new().await?;
    Ok(ApiResponse::created(service.create(&body.name, body.owner_id).await?))
}

/// GET /api/workspaces/:url
pub async fn get(Path(url): Path<String>) -> ApiResult<Workspace> {
    let service = WorkspaceService::new().await?;
    Ok(ApiResponse::success(service.get(&url).await?))
}
