//! Gallery, submission and interaction handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::Build;
use mime::Mime;
use serde::Deserialize;
use services::{ImageInput, SubmitBuild};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub author: String,
    pub text: String,
}

/// GET /api/builds?q=
pub async fn list_builds(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Build>>, ApiError> {
    Ok(Json(state.showcase.gallery.search(query.q.as_deref()).await?))
}

/// GET /api/builds/{id}
pub async fn get_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Build>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.showcase.gallery.detail(id).await?))
}

/// POST /api/builds
///
/// Multipart fields: `name`, `builderName`, `description`, and either an
/// `image` file or an `imageDataUri` text field. A file wins when both are
/// sent.
pub async fn submit_build(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Build>), ApiError> {
    let input = read_submission(multipart).await?;
    let build = state.showcase.submission.submit(input).await?;
    Ok((StatusCode::CREATED, Json(build)))
}

/// POST /api/builds/{id}/likes
pub async fn like_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Build>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.showcase.interaction.like(id).await?))
}

/// POST /api/builds/{id}/comments
pub async fn comment_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Build>), ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let build = state
        .showcase
        .interaction
        .comment(id, &body.author, &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(build)))
}

async fn read_submission(mut multipart: Multipart) -> Result<SubmitBuild, ApiError> {
    let mut name = String::new();
    let mut builder_name = String::new();
    let mut description = String::new();
    let mut file: Option<ImageInput> = None;
    let mut data_uri: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "name" => name = field.text().await?,
            "builderName" => builder_name = field.text().await?,
            "description" => description = field.text().await?,
            "imageDataUri" => data_uri = Some(field.text().await?),
            "image" => {
                let content_type = field_content_type(field.content_type(), field.file_name());
                let data = field.bytes().await?;
                if !data.is_empty() {
                    file = Some(ImageInput::Bytes { data, content_type });
                }
            }
            _ => {}
        }
    }

    // A missing image surfaces as a validation issue, not a bad request.
    let image = file.unwrap_or_else(|| ImageInput::DataUri(data_uri.unwrap_or_default()));
    Ok(SubmitBuild {
        name,
        builder_name,
        description,
        image,
    })
}

/// The declared part type, else a guess from the file name.
fn field_content_type(declared: Option<&str>, file_name: Option<&str>) -> Mime {
    declared
        .and_then(|ct| ct.parse::<Mime>().ok())
        .filter(|ct| *ct != mime::APPLICATION_OCTET_STREAM)
        .or_else(|| file_name.and_then(|f| mime_guess::from_path(f).first()))
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}
