pub mod admin;
pub mod builds;

use domains::BuildId;

use crate::error::ApiError;

fn parse_id(raw: &str) -> Result<BuildId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid build id: {raw}")))
}
