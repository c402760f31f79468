use axum::extract::{rejection::QueryRejection, Query};
use serde::{Deserialize, Serialize};

use crate::middleware::{ApiResponse, ApiResult};
use crate::pagination::{compute_window, PageEntry, PageLinks};

use super::query_params;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub current: u32,
    pub total: u32,
}

#[derive(Debug, Serialize)]
pub struct WindowResponse {
    pub current_page: u32,
    pub total_pages: u32,
    pub previous: Option<u32>,
    pub next: Option<u32>,
    pub pages: Vec<PageEntry>,
}

/// GET /api/pagination?current=&total= - page window for a navigation control
pub async fn get(query: Result<Query<WindowQuery>, QueryRejection>) -> ApiResult<WindowResponse> {
    let WindowQuery { current, total } = query_params(query)?;

    let pages = compute_window(current, total)?;
    let links = PageLinks::new(current, total)?;

    Ok(ApiResponse::success(WindowResponse {
        current_page: current,
        total_pages: total,
        previous: links.previous,
        next: links.next,
        pages,
    }))
}
