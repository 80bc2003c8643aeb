//! # Submission workflow
//!
//! Validate, upload, summarize and tag, then insert. Any failure before the
//! insert aborts the whole submission so no partial build is ever stored.

use std::sync::Arc;

use domains::{
    ApprovalPolicy, Build, BuildEvent, BuildRepository, DomainError, MediaStorage, NewBuild,
    Result, Summarizer, Tagger, ValidationError,
};
use tracing::{info, instrument, warn};

use crate::events::EventBus;
use crate::image::{DecodedImage, ImageInput};
use crate::validation::{
    clamp_summary, normalize_tags, require_min_chars, MIN_BUILDER_NAME, MIN_BUILD_NAME,
    MIN_DESCRIPTION,
};

#[derive(Debug, Clone)]
pub struct SubmitBuild {
    pub name: String,
    pub builder_name: String,
    pub description: String,
    pub image: ImageInput,
}

impl SubmitBuild {
    /// Checks every field and returns the decoded image, or all violations.
    pub fn validate(&self) -> std::result::Result<DecodedImage, ValidationError> {
        let mut errors = ValidationError::new();
        require_min_chars(
            &mut errors,
            "name",
            &self.name,
            MIN_BUILD_NAME,
            "Build name must be at least 3 characters.",
        );
        require_min_chars(
            &mut errors,
            "builderName",
            &self.builder_name,
            MIN_BUILDER_NAME,
            "Builder name must be at least 2 characters.",
        );
        require_min_chars(
            &mut errors,
            "description",
            &self.description,
            MIN_DESCRIPTION,
            "Description must be at least 20 characters.",
        );

        match self.image.decode() {
            Ok(image) => errors.into_result().map(|()| image),
            Err(image_errors) => {
                for issue in image_errors.issues() {
                    errors.push(issue.field, issue.message.clone());
                }
                Err(errors)
            }
        }
    }
}

pub struct SubmissionService {
    repo: Arc<dyn BuildRepository>,
    media: Arc<dyn MediaStorage>,
    summarizer: Arc<dyn Summarizer>,
    tagger: Arc<dyn Tagger>,
    events: EventBus,
    policy: ApprovalPolicy,
}

impl SubmissionService {
    pub fn new(
        repo: Arc<dyn BuildRepository>,
        media: Arc<dyn MediaStorage>,
        summarizer: Arc<dyn Summarizer>,
        tagger: Arc<dyn Tagger>,
        events: EventBus,
        policy: ApprovalPolicy,
    ) -> Self {
        Self {
            repo,
            media,
            summarizer,
            tagger,
            events,
            policy,
        }
    }

    pub fn policy(&self) -> ApprovalPolicy {
        self.policy
    }

    #[instrument(skip_all, fields(name = %input.name, builder = %input.builder_name))]
    pub async fn submit(&self, input: SubmitBuild) -> Result<Build> {
        let image = input.validate()?;

        let image_url = self
            .media
            .upload(image.data.clone(), image.content_type.clone())
            .await
            .map_err(|e| {
                warn!(error = %e, "image upload failed");
                as_upload_error(e)
            })?;

        let image_data_uri = image.to_data_uri();
        let (summary, tags) = tokio::try_join!(
            self.summarizer.summarize(&input.description),
            self.tagger.tag(&input.description, &image_data_uri),
        )
        .map_err(|e| {
            warn!(error = %e, "AI collaborator failed");
            as_ai_error(e)
        })?;

        let build = self
            .repo
            .insert(NewBuild {
                name: input.name,
                builder_name: input.builder_name,
                description: input.description,
                summary: clamp_summary(&summary),
                image_url,
                tags: normalize_tags(tags),
                status: self.policy.initial_status(),
            })
            .await?;

        info!(build_id = %build.id, status = %build.status, "build submitted");
        self.events.publish(BuildEvent::Submitted {
            id: build.id,
            status: build.status,
        });
        Ok(build)
    }
}

fn as_upload_error(e: DomainError) -> DomainError {
    match e {
        DomainError::Upload(_) => e,
        other => DomainError::Upload(other.to_string()),
    }
}

fn as_ai_error(e: DomainError) -> DomainError {
    match e {
        DomainError::AiService(_) => e,
        other => DomainError::AiService(other.to_string()),
    }
}
