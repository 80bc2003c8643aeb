//! # Gallery query
//!
//! Public reads. Only approved builds are searchable; the detail view shows
//! any build so a submitter can see their pending entry.

use std::sync::Arc;

use domains::{Build, BuildId, BuildRepository, Result};
use tracing::instrument;

pub struct GalleryService {
    repo: Arc<dyn BuildRepository>,
}

impl GalleryService {
    pub fn new(repo: Arc<dyn BuildRepository>) -> Self {
        Self { repo }
    }

    /// Approved builds matching `term`, newest first. A blank or absent term
    /// matches everything approved. Other terms are matched as typed,
    /// surrounding whitespace included.
    #[instrument(skip(self))]
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Build>> {
        let needle = term.filter(|t| !t.trim().is_empty()).map(str::to_lowercase);

        let mut builds: Vec<Build> = self
            .repo
            .list()
            .await?
            .into_iter()
            .filter(Build::is_approved)
            .filter(|build| needle.as_deref().map_or(true, |n| build.matches(n)))
            .collect();
        builds.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(builds)
    }

    pub async fn detail(&self, id: BuildId) -> Result<Build> {
        self.repo.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{BuildPatch, BuildStatus, NewBuild};
    use storage_adapters::memory::InMemoryBuildRepository;

    fn build(name: &str, description: &str, tags: &[&str], status: BuildStatus) -> NewBuild {
        NewBuild {
            name: name.into(),
            builder_name: "Alex".into(),
            description: description.into(),
            summary: String::new(),
            image_url: "https://cdn.test/x.png".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status,
        }
    }

    async fn gallery() -> (GalleryService, Arc<InMemoryBuildRepository>) {
        let repo = Arc::new(InMemoryBuildRepository::new());
        let fixtures = [
            (
                "Floating Celestial Castle",
                "Quartz spires in the clouds.",
                "fantasy",
                BuildStatus::Approved,
            ),
            (
                "Harbor Town",
                "A fishing village with a small CASTLE keep.",
                "town",
                BuildStatus::Approved,
            ),
            (
                "Desert Outpost",
                "Sandstone walls and a market.",
                "Castle-like",
                BuildStatus::Approved,
            ),
            (
                "Castle in Progress",
                "Pending castle submission.",
                "castle",
                BuildStatus::Pending,
            ),
            (
                "Steampunk Airship",
                "A ship of brass and copper.",
                "vehicle",
                BuildStatus::Approved,
            ),
        ];
        for (name, description, tag, status) in fixtures {
            repo.insert(build(name, description, &[tag], status)).await.unwrap();
        }
        (GalleryService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_search_matches_approved_only() {
        let (gallery, _) = gallery().await;
        let names: Vec<String> = gallery
            .search(Some("castle"))
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Desert Outpost", "Harbor Town", "Floating Celestial Castle"]);
    }

    #[tokio::test]
    async fn test_blank_term_returns_all_approved() {
        let (gallery, _) = gallery().await;
        assert_eq!(gallery.search(None).await.unwrap().len(), 4);
        assert_eq!(gallery.search(Some("   ")).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_padded_term_is_not_trimmed() {
        let (gallery, _) = gallery().await;
        let names: Vec<String> = gallery
            .search(Some(" castle "))
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Harbor Town"]);
    }

    #[tokio::test]
    async fn test_search_by_builder_case_insensitive() {
        let (gallery, _) = gallery().await;
        assert_eq!(gallery.search(Some("ALEX")).await.unwrap().len(), 4);
        assert!(gallery.search(Some("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approved_build_becomes_searchable() {
        let (gallery, repo) = gallery().await;
        let pending = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|b| b.status == BuildStatus::Pending)
            .unwrap();
        repo.update(pending.id, BuildPatch::status(BuildStatus::Approved))
            .await
            .unwrap();

        let results = gallery.search(Some("in progress")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(gallery.detail(pending.id).await.unwrap().status, BuildStatus::Approved);
    }
}
