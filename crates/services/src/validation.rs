//! Input length rules shared by the submission and interaction workflows.
//!
//! Lengths count Unicode scalar values and input is not trimmed first.

use domains::ValidationError;

pub const MIN_BUILD_NAME: usize = 3;
pub const MIN_BUILDER_NAME: usize = 2;
pub const MIN_DESCRIPTION: usize = 20;
pub const MIN_COMMENT_AUTHOR: usize = 2;
pub const MIN_COMMENT_TEXT: usize = 3;
pub const MAX_SUMMARY: usize = 100;

/// Records `message` against `field` when `value` is shorter than `min`.
pub(crate) fn require_min_chars(
    errors: &mut ValidationError,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.chars().count() < min {
        errors.push(field, message);
    }
}

/// Checks a comment before the build is looked up.
pub fn validate_comment(author: &str, text: &str) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();
    require_min_chars(
        &mut errors,
        "author",
        author,
        MIN_COMMENT_AUTHOR,
        "Name must be at least 2 characters.",
    );
    require_min_chars(
        &mut errors,
        "text",
        text,
        MIN_COMMENT_TEXT,
        "Comment must be at least 3 characters.",
    );
    errors.into_result()
}

/// Cuts collaborator output down to the summary limit.
pub(crate) fn clamp_summary(summary: &str) -> String {
    let trimmed = summary.trim();
    if trimmed.chars().count() <= MAX_SUMMARY {
        return trimmed.to_string();
    }
    trimmed.chars().take(MAX_SUMMARY).collect::<String>().trim_end().to_string()
}

/// Trims tags and drops empty ones, preserving order.
pub(crate) fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
