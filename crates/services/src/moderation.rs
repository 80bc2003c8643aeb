//! # Moderation workflow
//!
//! Approve or delete submissions, and list them for the admin view.

use std::sync::Arc;

use domains::{
    Build, BuildEvent, BuildId, BuildPatch, BuildRepository, BuildStatus, DomainError, Result,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::events::EventBus;

/// Every build, newest first, split by status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationQueue {
    pub pending_count: usize,
    pub approved_count: usize,
    pub pending: Vec<Build>,
    pub approved: Vec<Build>,
}

impl ModerationQueue {
    fn from_builds(builds: Vec<Build>) -> Self {
        let (approved, pending): (Vec<Build>, Vec<Build>) =
            builds.into_iter().partition(Build::is_approved);
        Self {
            pending_count: pending.len(),
            approved_count: approved.len(),
            pending,
            approved,
        }
    }
}

pub struct ModerationService {
    repo: Arc<dyn BuildRepository>,
    events: EventBus,
}

impl ModerationService {
    pub fn new(repo: Arc<dyn BuildRepository>, events: EventBus) -> Self {
        Self { repo, events }
    }

    /// Approving an already approved build succeeds without changing anything.
    #[instrument(skip(self))]
    pub async fn approve(&self, id: BuildId) -> Result<Build> {
        let current = self.repo.get(id).await?;
        if current.is_approved() {
            return Ok(current);
        }

        let build = self.repo.update(id, BuildPatch::status(BuildStatus::Approved)).await?;
        info!(build_id = %id, "build approved");
        self.events.publish(BuildEvent::Approved { id });
        Ok(build)
    }

    /// Permanent; comments go with the build. A second call reports NotFound.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: BuildId) -> Result<()> {
        if !self.repo.remove(id).await? {
            return Err(DomainError::NotFound(id));
        }
        info!(build_id = %id, "build deleted");
        self.events.publish(BuildEvent::Deleted { id });
        Ok(())
    }

    pub async fn queue(&self) -> Result<ModerationQueue> {
        self.repo.list().await.map(ModerationQueue::from_builds)
    }
}
