// HTTP handlers, one module per resource. Each handler extracts its input,
// calls into a service and wraps the result in the success envelope.

pub mod discussions;
pub mod issues;
pub mod labels;
pub mod pagination;
pub mod projects;
pub mod system;
pub mod workspaces;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::services::Page;

/// A page of results plus a ready-made query string for every clickable page
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub links: BTreeMap<u32, String>,
}

impl<T> Listing<T> {
    pub fn new(page: Page<T>, raw_query: Option<&str>) -> Self {
        let links = page.pagination.hrefs(raw_query.unwrap_or("")).into_iter().collect();
        Self { page, links }
    }
}

/// Unwrap a JSON body, turning axum's rejection into an enveloped 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

/// Unwrap query parameters, turning axum's rejection into an enveloped 400
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
