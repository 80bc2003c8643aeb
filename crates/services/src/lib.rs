//! # services
//!
//! Workflows over the domain ports: submission, moderation, interaction and
//! gallery queries. Every successful mutation is announced on the
//! [`EventBus`].

pub mod events;
pub mod gallery;
pub mod image;
pub mod interaction;
pub mod moderation;
pub mod submission;
pub mod validation;

use std::sync::Arc;

use domains::{ApprovalPolicy, BuildRepository, MediaStorage, Summarizer, Tagger};

pub use events::EventBus;
pub use gallery::GalleryService;
pub use image::{DecodedImage, ImageInput};
pub use interaction::InteractionService;
pub use moderation::{ModerationQueue, ModerationService};
pub use submission::{SubmissionService, SubmitBuild};

/// All workflows wired to one repository and one event bus.
pub struct Showcase {
    pub gallery: GalleryService,
    pub submission: SubmissionService,
    pub moderation: ModerationService,
    pub interaction: InteractionService,
    pub events: EventBus,
}

impl Showcase {
    pub fn new(
        repo: Arc<dyn BuildRepository>,
        media: Arc<dyn MediaStorage>,
        summarizer: Arc<dyn Summarizer>,
        tagger: Arc<dyn Tagger>,
        policy: ApprovalPolicy,
    ) -> Self {
        let events = EventBus::new();
        Self {
            gallery: GalleryService::new(repo.clone()),
            submission: SubmissionService::new(
                repo.clone(),
                media,
                summarizer,
                tagger,
                events.clone(),
                policy,
            ),
            moderation: ModerationService::new(repo.clone(), events.clone()),
            interaction: InteractionService::new(repo, events.clone()),
            events,
        }
    }
}
