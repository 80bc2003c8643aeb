//! Maps workflow errors to HTTP status codes and the error envelope:
//! `{"error": {"code", "message", "fields"?}}`.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Missing or wrong admin token.
    Unauthorized(String),
    /// The request could not be read (bad id, malformed body).
    BadRequest(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::BadRequest(format!("invalid multipart body: {e}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Upload(_) | DomainError::AiService(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Domain(DomainError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(DomainError::Validation(_)) => "VALIDATION_ERROR",
            ApiError::Domain(DomainError::NotFound(_)) => "BUILD_NOT_FOUND",
            ApiError::Domain(DomainError::Upload(_)) => "UPLOAD_FAILED",
            ApiError::Domain(DomainError::AiService(_)) => "AI_SERVICE_ERROR",
            ApiError::Domain(DomainError::Storage(_)) => "STORAGE_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            ApiError::Domain(DomainError::Validation(issues)) => json!({
                "error": {
                    "code": code,
                    "message": issues.to_string(),
                    "fields": issues,
                }
            }),
            ApiError::Domain(e) => json!({
                "error": { "code": code, "message": e.to_string() }
            }),
            ApiError::Unauthorized(msg) | ApiError::BadRequest(msg) => json!({
                "error": { "code": code, "message": msg }
            }),
        };

        if status.is_server_error() {
            if status == StatusCode::BAD_GATEWAY {
                warn!(code, error = ?self, "collaborator failure");
            } else {
                error!(code, error = ?self, "request failed");
            }
        }

        (status, Json(body)).into_response()
    }
}
