//! # Local media
//!
//! Filesystem implementation of `MediaStorage`.
//! Content-addressable: files are named by SHA-256 and sharded into
//! `ab/cd/<hash>.<ext>` directories, so identical uploads are stored once.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use domains::{DomainError, MediaStorage, Result};
use mime::Mime;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/media")
    url_prefix: String,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Self {
            root_path: root.into(),
            url_prefix,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root_path
    }

    /// "ab/cd/abcd...hash.png"
    fn relative_path(hash: &str, extension: &str) -> String {
        format!("{}/{}/{hash}.{extension}", &hash[0..2], &hash[2..4])
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, data: Bytes, content_type: Mime) -> Result<String> {
        let detected = sniff_image(&data)?;
        if detected != content_type {
            debug!(claimed = %content_type, %detected, "using detected image type");
        }
        let extension = mime_extension(&detected);

        let hash = hex::encode(Sha256::digest(&data));
        let relative = Self::relative_path(&hash, extension);
        let target = self.root_path.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::Upload(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let exists = fs::try_exists(&target).await.map_err(|e| {
            DomainError::Upload(format!("cannot check {}: {e}", target.display()))
        })?;
        if exists {
            debug!(%hash, "upload already stored");
        } else {
            fs::write(&target, &data).await.map_err(|e| {
                DomainError::Upload(format!("cannot write {}: {e}", target.display()))
            })?;
            info!(%hash, bytes = data.len(), "upload stored");
        }

        Ok(format!("{}/{relative}", self.url_prefix))
    }
}

/// Confirms the bytes are a known image format and returns its MIME type.
fn sniff_image(data: &[u8]) -> Result<Mime> {
    let format = image::guess_format(data)
        .map_err(|e| DomainError::Upload(format!("unrecognised image data: {e}")))?;
    format
        .to_mime_type()
        .parse()
        .map_err(|e| DomainError::Upload(format!("unsupported image format: {e}")))
}

fn mime_extension(content_type: &Mime) -> &'static str {
    match content_type.subtype().as_str() {
        "png" => "png",
        "jpeg" => "jpg",
        "gif" => "gif",
        "webp" => "webp",
        "bmp" => "bmp",
        "avif" => "avif",
        "tiff" => "tiff",
        _ => "img",
    }
}
