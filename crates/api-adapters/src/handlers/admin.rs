//! Moderation handlers. Every route requires [`AdminAccess`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::Build;
use services::ModerationQueue;

use super::parse_id;
use crate::error::ApiError;
use crate::extractors::AdminAccess;
use crate::state::AppState;

/// GET /api/admin/builds
pub async fn moderation_queue(
    State(state): State<AppState>,
    _admin: AdminAccess,
) -> Result<Json<ModerationQueue>, ApiError> {
    Ok(Json(state.showcase.moderation.queue().await?))
}

/// POST /api/admin/builds/{id}/approve
pub async fn approve_build(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path(id): Path<String>,
) -> Result<Json<Build>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.showcase.moderation.approve(id).await?))
}

/// DELETE /api/admin/builds/{id}
pub async fn delete_build(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.showcase.moderation.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
