use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{self, SecurityConfig};
use crate::handlers;

/// Build the full HTTP router with the global middleware applied
pub fn app() -> Router {
    let settings = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .merge(api_routes())
        .layer(RequestBodyLimitLayer::new(settings.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&settings.security) {
        router = router.layer(cors);
    }
    if settings.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn api_routes() -> Router {
    use handlers::{discussions, issues, labels, pagination, projects, workspaces};

    Router::new()
        .route("/api/pagination", get(pagination::get))
        // Label catalog
        .route("/api/labels", get(labels::list).post(labels::create))
        // Issues and their labels
        .route("/api/issues/:id", get(issues::get))
        .route("/api/issues/:id/status", patch(issues::update_status))
        .route(
            "/api/issues/:id/labels",
            get(labels::issue_list)
                .post(labels::issue_add)
                .put(labels::issue_replace),
        )
        .route("/api/issues/:id/labels/:label_id", delete(labels::issue_remove))
        // Workspaces and projects
        .route("/api/workspaces", post(workspaces::create))
        .route("/api/workspaces/:url", get(workspaces::get))
        .route(
            "/api/workspaces/:url/projects",
            get(projects::workspace_list).post(projects::create),
        )
        .route("/api/projects/:id/issues", get(issues::project_list))
        .route(
            "/api/projects/:id/discussions",
            get(discussions::project_list).post(discussions::create),
        )
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    Some(layer.allow_origin(AllowOrigin::list(origins)))
}
