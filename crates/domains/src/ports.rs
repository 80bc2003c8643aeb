//! # Ports
//!
//! Any adapter must implement these traits to be wired into the services.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use mime::Mime;

use crate::errors::Result;
use crate::models::{Build, BuildId, BuildPatch, Comment, NewBuild};

/// Persistence contract for builds and their comments.
///
/// No isolation is promised between concurrent callers of `get` + `update`;
/// the last write wins. Adapters that can do better override
/// `increment_likes` and `prepend_comment` with atomic versions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BuildRepository: Send + Sync {
    /// All builds, newest first.
    async fn list(&self) -> Result<Vec<Build>>;

    async fn get(&self, id: BuildId) -> Result<Build>;

    /// Assigns an id, starts with no likes or comments. Imports and seeding
    /// pass their own `created_at`.
    async fn insert_at(&self, build: NewBuild, created_at: DateTime<Utc>) -> Result<Build>;

    /// Inserts with the current time as `created_at`.
    async fn insert(&self, build: NewBuild) -> Result<Build> {
        self.insert_at(build, Utc::now()).await
    }

    async fn update(&self, id: BuildId, patch: BuildPatch) -> Result<Build>;

    /// Removes the build and its comments. `false` if it did not exist.
    async fn remove(&self, id: BuildId) -> Result<bool>;

    async fn increment_likes(&self, id: BuildId) -> Result<Build> {
        let build = self.get(id).await?;
        let patch = BuildPatch {
            likes: Some(build.likes.saturating_add(1)),
            ..BuildPatch::default()
        };
        self.update(id, patch).await
    }

    async fn prepend_comment(&self, id: BuildId, comment: Comment) -> Result<Build> {
        let build = self.get(id).await?;
        let mut comments = Vec::with_capacity(build.comments.len() + 1);
        comments.push(comment);
        comments.extend(build.comments);
        let patch = BuildPatch {
            comments: Some(comments),
            ..BuildPatch::default()
        };
        self.update(id, patch).await
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}

/// Media storage contract for submitted images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores raw bytes and returns a publicly resolvable URL.
    async fn upload(&self, data: Bytes, content_type: Mime) -> Result<String>;
}

/// Produces a short preview of a description.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, description: &str) -> Result<String>;
}

/// Produces search tags from a description and the image as a data URI.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Tagger: Send + Sync {
    async fn tag(&self, description: &str, image_data_uri: &str) -> Result<Vec<String>>;
}

