//! Builds the adapters named by the settings.

use std::sync::Arc;

use ai_adapters::{ExcerptSummarizer, HttpPromptClient, KeywordTagger};
use anyhow::Context;
use configs::{AiBackend, DatabaseBackend, MediaBackend, Settings};
use domains::{BuildRepository, MediaStorage, Summarizer, Tagger};
use services::Showcase;
use storage_adapters::seed::seed_samples;
use storage_adapters::{
    InMemoryBuildRepository, InlineMediaStorage, LocalMediaStorage, SqliteBuildRepository,
};
use tracing::info;

pub async fn showcase(settings: &Settings) -> anyhow::Result<Showcase> {
    let repo = repository(settings).await?;
    if settings.seed_samples {
        seed_samples(repo.as_ref()).await.context("seeding sample builds")?;
    }

    let (summarizer, tagger) = collaborators(settings)?;
    Ok(Showcase::new(
        repo,
        media(settings),
        summarizer,
        tagger,
        settings.moderation.approval,
    ))
}

async fn repository(settings: &Settings) -> anyhow::Result<Arc<dyn BuildRepository>> {
    match settings.database.backend {
        DatabaseBackend::Memory => {
            info!("using in-memory build store");
            Ok(Arc::new(InMemoryBuildRepository::new()))
        }
        DatabaseBackend::Sqlite => {
            let url = settings
                .database
                .url
                .as_deref()
                .context("database.url is required for the sqlite backend")?;
            let repo = SqliteBuildRepository::new(url)
                .await
                .with_context(|| format!("opening {url}"))?;
            Ok(Arc::new(repo))
        }
    }
}

fn media(settings: &Settings) -> Arc<dyn MediaStorage> {
    match settings.media.backend {
        MediaBackend::Inline => Arc::new(InlineMediaStorage::new()),
        MediaBackend::Local => Arc::new(LocalMediaStorage::new(
            settings.media.root.clone(),
            settings.media.url_prefix.clone(),
        )),
    }
}

fn collaborators(settings: &Settings) -> anyhow::Result<(Arc<dyn Summarizer>, Arc<dyn Tagger>)> {
    match settings.ai.backend {
        AiBackend::Heuristic => {
            let summarizer: Arc<dyn Summarizer> = Arc::new(ExcerptSummarizer::new());
            let tagger: Arc<dyn Tagger> = Arc::new(KeywordTagger::new());
            Ok((summarizer, tagger))
        }
        AiBackend::Http => {
            let endpoint = settings
                .ai
                .endpoint
                .as_deref()
                .context("ai.endpoint is required for the http backend")?;
            info!(endpoint, "using remote prompt flows");
            let client = Arc::new(HttpPromptClient::new(endpoint, settings.ai.api_key.clone()));
            let summarizer: Arc<dyn Summarizer> = client.clone();
            let tagger: Arc<dyn Tagger> = client;
            Ok((summarizer, tagger))
        }
    }
}
