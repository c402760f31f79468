use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Path, Query, RawQuery,
};
use serde::Deserialize;

use crate::database::models::Discussion;
use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::PageQuery;
use crate::services::DiscussionService;

use super::{json_body, query_params, Listing};

#[derive(Debug, Deserialize)]
pub struct CreateDiscussion {
    pub title: String,
    pub content: String,
    pub author_id: i32,
}

/// GET /api/projects/:id/discussions?page= - one page of a project's discussions
pub async fn project_list(
    Path(project_id): Path<i32>,
    RawQuery(raw): RawQuery,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Listing<Discussion>> {
    let query = query_params(query)?;
    let service = DiscussionService::new().await?;
    let page = service.list(project_id, &query).await?;
    Ok(ApiResponse::success(Listing::new(page, raw.as_deref())))
}

/// POST /api/projects/:id/discussions - start `{title, content, author_id}`
pub async fn create(
    Path(project_id): Path<i32>,
    payload: Result<Json<CreateDiscussion>, JsonRejection>,
) -> ApiResult<Discussion> {
    let body = json_body(payload)?;
    let service = DiscussionService::new().await?;
    let discussion = service
        .create(project_id, body.author_id, &body.title, &body.content)
        .await?;
    Ok(ApiResponse::created(discussion))
}
