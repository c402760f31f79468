use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Path, Query, RawQuery,
};
use serde::Deserialize;

use crate::database::models::{Issue, IssueSummary};
use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::PageQuery;
use crate::services::{IssueDetail, IssueService};
use crate::types::Status;

use super::{json_body, query_params, Listing};

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Status,
}

/// GET /api/issues/:id - issue with its labels and canonical path
pub async fn get(Path(issue_id): Path<i32>) -> ApiResult<IssueDetail> {
    let service = IssueService::new().await?;
    Ok(ApiResponse::success(service.detail(issue_id).await?))
}

/// PATCH /api/issues/:id/status - move an issue to `{status}`
pub async fn update_status(
    Path(issue_id): Path<i32>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Issue> {
    let body = json_body(payload)?;
    let service = IssueService::new().await?;
    Ok(ApiResponse::success(service.set_status(issue_id, body.status).await?))
}

/// GET /api/projects/:id/issues?page= - one page of a project's issues
pub async fn project_list(
    Path(project_id): Path<i32>,
    RawQuery(raw): RawQuery,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<IssueSummary>> {
    let query = query_params(query)?;
    let service = IssueService::new().await?;
    let page = service.list(project_id, &query).await?;
    Ok(ApiResponse::success(Listing::new(page, raw.as_deref())))
}
