//! # Domain Models
//!
//! These structs represent the core entities of the showcase.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a submitted build. Never reused, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(pub Uuid);

impl BuildId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BuildId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identity of a comment within its parent build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Two-state moderation lifecycle. There is no rejected state: a rejected
/// submission is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Pending,
    Approved,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Pending => "pending",
            BuildStatus::Approved => "approved",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BuildStatus::Pending),
            "approved" => Ok(BuildStatus::Approved),
            other => Err(format!("unknown build status '{other}'")),
        }
    }
}

/// A reply attached to exactly one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            author: author.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// A submitted creative work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: BuildId,
    pub name: String,
    pub builder_name: String,
    pub description: String,
    /// Short preview text, at most 100 characters
    pub summary: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub status: BuildStatus,
    pub created_at: DateTime<Utc>,
    pub likes: u64,
    /// Newest first
    pub comments: Vec<Comment>,
}

impl Build {
    pub fn is_approved(&self) -> bool {
        self.status == BuildStatus::Approved
    }

    /// Case-insensitive substring match over name, builder, description and tags.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.builder_name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Caller-supplied fields of a build. The store assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBuild {
    pub name: String,
    pub builder_name: String,
    pub description: String,
    pub summary: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub status: BuildStatus,
}

impl NewBuild {
    /// Materialises the record with store-assigned fields.
    pub fn into_build(self, id: BuildId, created_at: DateTime<Utc>) -> Build {
        Build {
            id,
            name: self.name,
            builder_name: self.builder_name,
            description: self.description,
            summary: self.summary,
            image_url: self.image_url,
            tags: self.tags,
            status: self.status,
            created_at,
            likes: 0,
            comments: Vec::new(),
        }
    }
}

/// Partial update. Only the mutable parts of a build appear here; summary,
/// image and tags are fixed at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPatch {
    pub status: Option<BuildStatus>,
    pub likes: Option<u64>,
    pub comments: Option<Vec<Comment>>,
}

impl BuildPatch {
    pub fn status(status: BuildStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.likes.is_none() && self.comments.is_none()
    }

    pub fn apply(self, build: &mut Build) {
        if let Some(status) = self.status {
            build.status = status;
        }
        if let Some(likes) = self.likes {
            build.likes = likes;
        }
        if let Some(comments) = self.comments {
            build.comments = comments;
        }
    }
}

/// Whether new submissions wait for an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    #[default]
    RequireApproval,
    AutoApprove,
}

impl ApprovalPolicy {
    pub fn initial_status(&self) -> BuildStatus {
        match self {
            ApprovalPolicy::RequireApproval => BuildStatus::Pending,
            ApprovalPolicy::AutoApprove => BuildStatus::Approved,
        }
    }
}

/// Views that display a build and must be refreshed when it changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Gallery,
    Admin,
    Detail { id: BuildId },
}

impl View {
    pub fn path(&self) -> String {
        match self {
            View::Gallery => "/".to_string(),
            View::Admin => "/admin".to_string(),
            View::Detail { id } => format!("/build/{id}"),
        }
    }
}

/// Emitted after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildEvent {
    Submitted { id: BuildId, status: BuildStatus },
    Approved { id: BuildId },
    Deleted { id: BuildId },
    Liked { id: BuildId, likes: u64 },
    Commented { id: BuildId, comment_id: CommentId },
}

impl BuildEvent {
    pub fn build_id(&self) -> BuildId {
        match self {
            BuildEvent::Submitted { id, .. }
            | BuildEvent::Approved { id }
            | BuildEvent::Deleted { id }
            | BuildEvent::Liked { id, .. }
            | BuildEvent::Commented { id, .. } => *id,
        }
    }

    /// The views whose cached rendering this event invalidates.
    pub fn affected_views(&self) -> Vec<View> {
        let id = self.build_id();
        match self {
            BuildEvent::Submitted { .. } => vec![View::Gallery, View::Admin],
            BuildEvent::Approved { .. } | BuildEvent::Deleted { .. } => {
                vec![View::Gallery, View::Admin, View::Detail { id }]
            }
            BuildEvent::Liked { .. } | BuildEvent::Commented { .. } => vec![View::Detail { id }],
        }
    }
}
