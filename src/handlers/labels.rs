use axum::extract::{rejection::JsonRejection, Json, Path};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::labels::{Label, LabelChange};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LabelService;

use super::json_body;

#[derive(Debug, Deserialize)]
pub struct CreateLabel {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachLabel {
    pub label_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceLabels {
    pub label_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResult {
    pub applied: Vec<LabelChange>,
    pub labels: Vec<Label>,
}

/// GET /api/labels - label catalog ordered by id
pub async fn list() -> ApiResult<Vec<Label>> {
    let service = LabelService::new().await?;
    Ok(ApiResponse::success(service.catalog().await?))
}

/// POST /api/labels - create a label `{name, color}`
pub async fn create(payload: Result<Json<CreateLabel>, JsonRejection>) -> ApiResult<Label> {
    let body = json_body(payload)?;
    let service = LabelService::new().await?;
    Ok(ApiResponse::created(service.create(&body.name, &body.color).await?))
}

/// GET /api/issues/:id/labels - labels attached to an issue
pub async fn issue_list(Path(issue_id): Path<i32>) -> ApiResult<Vec<Label>> {
    let service = LabelService::new().await?;
    Ok(ApiResponse::success(service.for_issue(issue_id).await?))
}

/// POST /api/issues/:id/labels - attach `{label_id}`; returns the issue's labels
pub async fn issue_add(
    Path(issue_id): Path<i32>,
    payload: Result<Json<AttachLabel>, JsonRejection>,
) -> ApiResult<Vec<Label>> {
    let body = json_body(payload)?;
    let service = LabelService::new().await?;
    Ok(ApiResponse::success(service.attach(issue_id, body.label_id).await?))
}

/// DELETE /api/issues/:id/labels/:label_id - detach; returns the issue's labels
pub async fn issue_remove(Path((issue_id, label_id)): Path<(i32, i32)>) -> ApiResult<Vec<Label>> {
    let service = LabelService::new().await?;
    Ok(ApiResponse::success(service.detach(issue_id, label_id).await?))
}

/// PUT /api/issues/:id/labels - replace the selection with `{label_ids}`
///
/// Only the difference from the stored labels is written. Responds 502 with the
/// applied and failed changes when any add or remove could not be applied.
pub async fn issue_replace(
    Path(issue_id): Path<i32>,
    payload: Result<Json<ReplaceLabels>, JsonRejection>,
) -> ApiResult<ReplaceResult> {
    let body = json_body(payload)?;
    let service = LabelService::new().await?;

    let outcome = service.replace(issue_id, &body.label_ids).await?;
    if !outcome.failures.is_empty() {
        let failed: Vec<LabelChange> = outcome.failures.iter().map(|f| f.change).collect();
        return Err(ApiError::bad_gateway(
            format!("{} label change(s) failed for issue {}", failed.len(), issue_id),
            outcome.applied,
            failed,
        ));
    }

    Ok(ApiResponse::success(ReplaceResult {
        applied: outcome.applied,
        labels: service.for_issue(issue_id).await?,
    }))
}
