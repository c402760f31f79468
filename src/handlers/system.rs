use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;

/// GET / - service info
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Tracker API",
            "version": version,
            "description": "Workspaces, projects, issues, labels and discussions over PostgreSQL",
            "endpoints": {
                "health": "/health",
                "pagination": "/api/pagination?current=&total=",
                "labels": "/api/labels",
                "issues": "/api/issues/:id[/status|/labels[/:label_id]]",
                "workspaces": "/api/workspaces[/:url[/projects]]",
                "projects": "/api/projects/:id/{issues,discussions}?page=",
            }
        }
    }))
}

/// GET /health - database connectivity, 503 when the database cannot be reached
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let detail = if crate::is_production!() {
                "unavailable".to_string()
            } else {
                e.to_string()
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": detail
                    }
                })),
            )
        }
    }
}
