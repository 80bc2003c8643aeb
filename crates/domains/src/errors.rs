//! # DomainError
//!
//! Centralized error handling for the showcase.
//! Maps workflow failures to actionable error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::BuildId;

/// One violated input rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// Every rule an input violated, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.push(field, message);
        err
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// True if any issue concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// `Ok(())` when nothing was violated, otherwise the collected error.
    pub fn into_result(self) -> std::result::Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.issues.iter().map(|i| i.message.as_str()).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for all workflow and store operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Bad input shape or length; nothing was written
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced build does not exist
    #[error("build not found with ID {0}")]
    NotFound(BuildId),

    /// Media upload collaborator failed
    #[error("upload failed: {0}")]
    Upload(String),

    /// Summarization or tagging collaborator failed
    #[error("AI service error: {0}")]
    AiService(String),

    /// Store backend failure (e.g., SQLite I/O). The in-memory store never
    /// produces this.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for showcase logic.
pub type Result<T> = std::result::Result<T, DomainError>;
