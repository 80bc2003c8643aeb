//! Shared fixtures for the cross-crate tests.

use std::sync::Arc;

use ai_adapters::{ExcerptSummarizer, KeywordTagger};
use bytes::Bytes;
use domains::{ApprovalPolicy, BuildRepository, BuildStatus, NewBuild, Summarizer, Tagger};
use services::{ImageInput, Showcase, SubmitBuild};
use storage_adapters::{InMemoryBuildRepository, InlineMediaStorage};

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

pub fn png_image() -> ImageInput {
    ImageInput::Bytes {
        data: Bytes::from_static(PNG),
        content_type: mime::IMAGE_PNG,
    }
}

pub fn submission(name: &str, description: &str) -> SubmitBuild {
    SubmitBuild {
        name: name.to_string(),
        builder_name: "Morgan".to_string(),
        description: description.to_string(),
        image: png_image(),
    }
}

pub fn new_build(name: &str, status: BuildStatus) -> NewBuild {
    NewBuild {
        name: name.to_string(),
        builder_name: "Morgan".to_string(),
        description: format!("{name} built block by block over a long weekend."),
        summary: format!("{name}."),
        image_url: "https://picsum.photos/seed/fixture/600/400".to_string(),
        tags: vec!["fixture".to_string()],
        status,
    }
}

/// A showcase over a fresh in-memory store with the offline collaborators.
pub fn offline_showcase(policy: ApprovalPolicy) -> (Arc<Showcase>, Arc<InMemoryBuildRepository>) {
    let repo = Arc::new(InMemoryBuildRepository::new());
    let showcase = Showcase::new(
        repo.clone(),
        Arc::new(InlineMediaStorage::new()),
        Arc::new(ExcerptSummarizer::new()),
        Arc::new(KeywordTagger::new()),
        policy,
    );
    (Arc::new(showcase), repo)
}

/// Same, with caller-supplied collaborators.
pub fn showcase_with(
    repo: Arc<dyn BuildRepository>,
    summarizer: Arc<dyn Summarizer>,
    tagger: Arc<dyn Tagger>,
) -> Showcase {
    Showcase::new(
        repo,
        Arc::new(InlineMediaStorage::new()),
        summarizer,
        tagger,
        ApprovalPolicy::RequireApproval,
    )
}
