//! Admin token extractor.
//!
//! Admin routes take an [`AdminAccess`] argument. When a token is configured
//! the request must carry it in the `x-admin-token` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use secrecy::ExposeSecret;

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extracting this validates the admin token.
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = &state.admin_token else {
            return Ok(AdminAccess);
        };

        let provided = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {ADMIN_TOKEN_HEADER} header")))?
            .to_str()
            .map_err(|_| {
                ApiError::Unauthorized(format!("invalid {ADMIN_TOKEN_HEADER} header encoding"))
            })?;

        if tokens_match(provided.trim().as_bytes(), expected.expose_secret().as_bytes()) {
            Ok(AdminAccess)
        } else {
            Err(ApiError::Unauthorized("invalid admin token".to_string()))
        }
    }
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(provided: &[u8], expected: &[u8]) -> bool {
    provided.len() == expected.len()
        && provided
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
