//! Axum router configuration.
//!
//! Public routes live under `/api/builds`, moderation under
//! `/api/admin/builds`. Middleware: CORS, tracing.

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Upper bound for a multipart submission, image included.
pub const MAX_SUBMISSION_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/builds",
            get(handlers::builds::list_builds)
                .post(handlers::builds::submit_build)
                .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES)),
        )
        .route("/builds/{id}", get(handlers::builds::get_build))
        .route("/builds/{id}/likes", post(handlers::builds::like_build))
        .route("/builds/{id}/comments", post(handlers::builds::comment_build))
        .route("/admin/builds", get(handlers::admin::moderation_queue))
        .route(
            "/admin/builds/{id}",
            delete(handlers::admin::delete_build),
        )
        .route("/admin/builds/{id}/approve", post(handlers::admin::approve_build));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves files written by the local media store under its URL prefix.
pub fn serve_media(router: Router, url_prefix: &str, root: impl AsRef<Path>) -> Router {
    tracing::info!(prefix = url_prefix, root = %root.as_ref().display(), "serving local media");
    router.nest_service(url_prefix, ServeDir::new(root))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
