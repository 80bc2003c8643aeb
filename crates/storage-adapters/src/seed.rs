//! Sample builds for demos and local development.

use chrono::{DateTime, Utc};
use domains::{Build, BuildRepository, BuildStatus, DomainError, NewBuild, Result};
use tracing::info;

/// A sample and the RFC 3339 time it was first published.
#[derive(Debug, Clone)]
pub struct SampleBuild {
    pub build: NewBuild,
    pub created_at: &'static str,
}

#[allow(clippy::too_many_arguments)]
fn sample(
    name: &str,
    builder_name: &str,
    description: &str,
    summary: &str,
    seed: &str,
    tags: &[&str],
    status: BuildStatus,
    created_at: &'static str,
) -> SampleBuild {
    SampleBuild {
        build: NewBuild {
            name: name.into(),
            builder_name: builder_name.into(),
            description: description.into(),
            summary: summary.into(),
            image_url: format!("https://picsum.photos/seed/{seed}/1280/720"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status,
        },
        created_at,
    }
}

/// Oldest first.
pub fn sample_builds() -> Vec<SampleBuild> {
    vec![
        sample(
            "Modern Minimalist Villa",
            "Jane",
            "A sleek and modern villa with clean lines and an open-plan design. Built with \
             concrete, glass, and wood planks, it boasts a swimming pool, a rooftop terrace, and \
             large windows offering panoramic views of the surrounding landscape. The interior \
             is decorated with minimalist furniture and smart redstone lighting.",
            "A sleek modern villa with a minimalist design, swimming pool, and rooftop terrace.",
            "modern-villa",
            &["modern", "villa", "architecture", "redstone"],
            BuildStatus::Approved,
            "2023-10-24T18:00:00Z",
        ),
        sample(
            "Underground Dwarven City",
            "Steve",
            "Carved deep into a mountain, this dwarven city is a marvel of underground \
             engineering. It features a grand hall with massive pillars, a bustling marketplace, \
             a functional minecart system, and lava forges that light up the stone halls. The \
             city is self-sufficient with underground farms and reservoirs.",
            "An underground dwarven city carved into a mountain, with a grand hall and minecarts.",
            "dwarven-city",
            &["underground", "dwarven", "city", "engineering"],
            BuildStatus::Approved,
            "2023-10-25T14:30:00Z",
        ),
        sample(
            "Floating Celestial Castle",
            "Alex",
            "A magnificent castle floating among the clouds, built with quartz and prismarine. \
             It features tall spires, a grand central keep, and cascading waterfalls that fall \
             into the void. The interior is lavishly decorated with gold blocks, chandeliers, \
             and intricate stained glass windows depicting celestial scenes.",
            "A magnificent castle floating among the clouds, featuring tall spires and waterfalls.",
            "castle",
            &["castle", "fantasy", "survival-friendly", "mega-build"],
            BuildStatus::Approved,
            "2023-10-26T10:00:00Z",
        ),
        sample(
            "Steampunk Airship",
            "Chris",
            "A massive steampunk airship designed for exploration. It has a detailed engine room \
             with moving parts, a luxurious captain's quarters, and a deck with cannons. The \
             balloon is made of striped wool, and the ship is adorned with copper and brass \
             details.",
            "A detailed steampunk airship with a full interior and intricate engine room.",
            "airship",
            &["steampunk", "airship", "vehicle"],
            BuildStatus::Pending,
            "2023-10-27T09:00:00Z",
        ),
    ]
}

/// Inserts the samples with their original dates unless the store already
/// holds builds.
pub async fn seed_samples(repo: &dyn BuildRepository) -> Result<Vec<Build>> {
    if repo.count().await? > 0 {
        info!("store not empty, skipping sample builds");
        return Ok(Vec::new());
    }

    let mut inserted = Vec::new();
    for sample in sample_builds() {
        let created_at = DateTime::parse_from_rfc3339(sample.created_at)
            .map_err(|e| DomainError::Storage(format!("sample date {}: {e}", sample.created_at)))?
            .with_timezone(&Utc);
        inserted.push(repo.insert_at(sample.build, created_at).await?);
    }
    info!(count = inserted.len(), "sample builds seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBuildRepository;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_seed_is_skipped_when_not_empty() {
        let repo = InMemoryBuildRepository::new();
        assert_eq!(seed_samples(&repo).await.unwrap().len(), 4);
        assert!(seed_samples(&repo).await.unwrap().is_empty());

        let builds = repo.list().await.unwrap();
        assert_eq!(builds.len(), 4);
        assert_eq!(builds[0].name, "Steampunk Airship");
        assert_eq!(builds.iter().filter(|b| b.is_approved()).count(), 3);
        assert!(builds.iter().all(|b| b.summary.chars().count() <= 100));
    }

    #[tokio::test]
    async fn test_samples_keep_their_publication_dates() {
        let repo = InMemoryBuildRepository::new();
        seed_samples(&repo).await.unwrap();

        let builds = repo.list().await.unwrap();
        let airship = &builds[0];
        assert_eq!(airship.created_at, Utc.with_ymd_and_hms(2023, 10, 27, 9, 0, 0).unwrap());
        assert!(airship.description.ends_with("adorned with copper and brass details."));

        let names: Vec<&str> = builds.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Steampunk Airship",
                "Floating Celestial Castle",
                "Underground Dwarven City",
                "Modern Minimalist Villa",
            ]
        );
        assert!(builds
            .iter()
            .all(|b| b.created_at < Utc.with_ymd_and_hms(2023, 10, 28, 0, 0, 0).unwrap()));
    }
}
