//! # Inline media
//!
//! Stores nothing: the "URL" is the image itself as a data URI. Suitable for
//! small deployments where builds are rendered straight from the record.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use domains::{MediaStorage, Result};
use mime::Mime;

#[derive(Debug, Clone, Default)]
pub struct InlineMediaStorage;

impl InlineMediaStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaStorage for InlineMediaStorage {
    async fn upload(&self, data: Bytes, content_type: Mime) -> Result<String> {
        Ok(format!(
            "data:{};base64,{}",
            content_type.essence_str(),
            STANDARD.encode(&data)
        ))
    }
}
