//! # Interaction workflow
//!
//! Likes and comments on a single build.

use std::sync::Arc;

use domains::{Build, BuildEvent, BuildId, BuildRepository, Comment, Result};
use tracing::{info, instrument};

use crate::events::EventBus;
use crate::validation::validate_comment;

pub struct InteractionService {
    repo: Arc<dyn BuildRepository>,
    events: EventBus,
}

impl InteractionService {
    pub fn new(repo: Arc<dyn BuildRepository>, events: EventBus) -> Self {
        Self { repo, events }
    }

    /// Adds exactly one like. There is no per-user dedup.
    #[instrument(skip(self))]
    pub async fn like(&self, id: BuildId) -> Result<Build> {
        let build = self.repo.increment_likes(id).await?;
        info!(build_id = %id, likes = build.likes, "build liked");
        self.events.publish(BuildEvent::Liked {
            id,
            likes: build.likes,
        });
        Ok(build)
    }

    /// Validates before looking the build up, then puts the comment first.
    #[instrument(skip(self, text))]
    pub async fn comment(&self, id: BuildId, author: &str, text: &str) -> Result<Build> {
        validate_comment(author, text)?;

        let comment = Comment::new(author, text);
        let comment_id = comment.id;
        let build = self.repo.prepend_comment(id, comment).await?;
        info!(build_id = %id, %comment_id, "comment added");
        self.events.publish(BuildEvent::Commented { id, comment_id });
        Ok(build)
    }
}
