//! Inserts the sample builds into the configured SQLite store.
//!
//! Does nothing when the store already holds builds.

use anyhow::{bail, Context};
use configs::{DatabaseBackend, Settings};
use storage_adapters::seed::seed_samples;
use storage_adapters::SqliteBuildRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("loading configuration")?;
    if settings.database.backend != DatabaseBackend::Sqlite {
        bail!(
            "the in-memory store does not outlive this process; \
             set database.backend = \"sqlite\" or use seed_samples"
        );
    }
    let url = settings
        .database
        .url
        .as_deref()
        .context("database.url is required for the sqlite backend")?;

    let repo = SqliteBuildRepository::new(url)
        .await
        .with_context(|| format!("opening {url}"))?;
    let inserted = seed_samples(&repo).await?;

    for build in &inserted {
        info!(id = %build.id, name = %build.name, status = %build.status, "seeded");
    }
    info!(count = inserted.len(), database_url = url, "seed complete");
    Ok(())
}
