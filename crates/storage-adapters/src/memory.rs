//! # In-memory store
//!
//! `DashMap`-backed implementation of `BuildRepository`. Updates to a single
//! build happen under its shard lock; nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domains::{Build, BuildId, BuildPatch, BuildRepository, Comment, DomainError, NewBuild, Result};
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryBuildRepository {
    builds: DashMap<BuildId, Build>,
}

impl InMemoryBuildRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `f` to the stored build under its entry lock.
    fn modify(&self, id: BuildId, f: impl FnOnce(&mut Build)) -> Result<Build> {
        let mut entry = self.builds.get_mut(&id).ok_or(DomainError::NotFound(id))?;
        f(entry.value_mut());
        Ok(entry.value().clone())
    }
}

#[async_trait]
impl BuildRepository for InMemoryBuildRepository {
    async fn list(&self) -> Result<Vec<Build>> {
        let mut builds: Vec<Build> =
            self.builds.iter().map(|entry| entry.value().clone()).collect();
        builds.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(builds)
    }

    async fn get(&self, id: BuildId) -> Result<Build> {
        self.builds
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DomainError::NotFound(id))
    }

    async fn insert_at(&self, build: NewBuild, created_at: DateTime<Utc>) -> Result<Build> {
        let build = build.into_build(BuildId::new(), created_at);
        self.builds.insert(build.id, build.clone());
        debug!(build_id = %build.id, "build stored in memory");
        Ok(build)
    }

    async fn update(&self, id: BuildId, patch: BuildPatch) -> Result<Build> {
        self.modify(id, |build| patch.apply(build))
    }

    async fn remove(&self, id: BuildId) -> Result<bool> {
        Ok(self.builds.remove(&id).is_some())
    }

    async fn increment_likes(&self, id: BuildId) -> Result<Build> {
        self.modify(id, |build| build.likes = build.likes.saturating_add(1))
    }

    async fn prepend_comment(&self, id: BuildId, comment: Comment) -> Result<Build> {
        self.modify(id, |build| build.comments.insert(0, comment))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.builds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::BuildStatus;
    use std::sync::Arc;

    fn new_build(name: &str) -> NewBuild {
        NewBuild {
            name: name.into(),
            builder_name: "Alex".into(),
            description: "A magnificent castle floating among the clouds.".into(),
            summary: "A floating castle.".into(),
            image_url: "https://cdn.test/castle.png".into(),
            tags: vec!["castle".into(), "fantasy".into()],
            status: BuildStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get_round_trips() {
        let repo = InMemoryBuildRepository::new();
        let input = new_build("Celestial Castle");
        let stored = repo.insert(input.clone()).await.unwrap();
        let fetched = repo.get(stored.id).await.unwrap();

        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.builder_name, input.builder_name);
        assert_eq!(fetched.description, input.description);
        assert_eq!(fetched.summary, input.summary);
        assert_eq!(fetched.image_url, input.image_url);
        assert_eq!(fetched.tags, input.tags);
        assert_eq!(fetched.status, input.status);
        assert_eq!(fetched.likes, 0);
        assert!(fetched.comments.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_list_is_newest_first() {
        let repo = InMemoryBuildRepository::new();
        let first = repo.insert(new_build("First")).await.unwrap();
        let second = repo.insert(new_build("Second")).await.unwrap();
        assert_ne!(first.id, second.id);

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_remove_cascades_and_reports() {
        let repo = InMemoryBuildRepository::new();
        let id = repo.insert(new_build("Doomed")).await.unwrap().id;
        repo.prepend_comment(id, Comment::new("Steve", "Nice!")).await.unwrap();

        assert!(repo.remove(id).await.unwrap());
        assert!(!repo.remove(id).await.unwrap());
        assert!(matches!(repo.get(id).await, Err(DomainError::NotFound(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryBuildRepository::new();
        let result = repo
            .update(BuildId::new(), BuildPatch::status(BuildStatus::Approved))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_likes_are_not_lost() {
        let repo = Arc::new(InMemoryBuildRepository::new());
        let id = repo.insert(new_build("Popular")).await.unwrap().id;

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_likes(id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.get(id).await.unwrap().likes, 50);
    }
}
