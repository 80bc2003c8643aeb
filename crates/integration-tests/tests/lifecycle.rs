use std::sync::Arc;

use ai_adapters::{ExcerptSummarizer, KeywordTagger};
use domains::{
    ApprovalPolicy, BuildEvent, BuildRepository, BuildStatus, DomainError, MockSummarizer,
    MockTagger, View,
};
use integration_tests::{new_build, offline_showcase, showcase_with, submission};
use storage_adapters::InMemoryBuildRepository;

const CASTLE: &str = "A medieval castle with four towers overlooking a quiet lake.";

#[tokio::test]
async fn test_submission_starts_pending_and_empty() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let mut events = showcase.events.subscribe();

    let build = showcase
        .submission
        .submit(submission("Lakeside Castle", CASTLE))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(build.status, BuildStatus::Pending);
    assert_eq!(build.likes, 0);
    assert!(build.comments.is_empty());
    assert!(build.tags.contains(&"castle".to_string()));
    assert_eq!(repo.get(build.id).await.unwrap(), build);

    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        BuildEvent::Submitted {
            id: build.id,
            status: BuildStatus::Pending
        }
    );
    assert_eq!(event.affected_views(), vec![View::Gallery, View::Admin]);
}

#[tokio::test]
async fn test_auto_approve_is_searchable_immediately() {
    let (showcase, _) = offline_showcase(ApprovalPolicy::AutoApprove);
    let build = showcase
        .submission
        .submit(submission("Lakeside Castle", CASTLE))
        .await
        .unwrap();

    assert_eq!(build.status, BuildStatus::Approved);
    let found = showcase.gallery.search(Some("lakeside")).await.unwrap();
    assert_eq!(found, vec![build]);
}

#[tokio::test]
async fn test_summarizer_failure_leaves_store_untouched() {
    let repo = Arc::new(InMemoryBuildRepository::new());
    let mut summarizer = MockSummarizer::new();
    summarizer
        .expect_summarize()
        .returning(|_| Err(DomainError::AiService("model overloaded".into())));

    let showcase = showcase_with(
        repo.clone(),
        Arc::new(summarizer),
        Arc::new(KeywordTagger::new()),
    );
    let err = showcase
        .submission
        .submit(submission("Lakeside Castle", CASTLE))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::AiService(_)));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_tagger_failure_leaves_store_untouched() {
    let repo = Arc::new(InMemoryBuildRepository::new());
    repo.insert(new_build("Existing Farm", BuildStatus::Approved)).await.unwrap();

    let mut tagger = MockTagger::new();
    tagger
        .expect_tag()
        .returning(|_, _| Err(DomainError::AiService("timeout".into())));

    let showcase = showcase_with(
        repo.clone(),
        Arc::new(ExcerptSummarizer::new()),
        Arc::new(tagger),
    );
    assert!(showcase
        .submission
        .submit(submission("Lakeside Castle", CASTLE))
        .await
        .is_err());
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_submission_reports_fields() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let err = showcase
        .submission
        .submit(submission("Ab", "too short"))
        .await
        .unwrap_err();

    let DomainError::Validation(issues) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert!(issues.has_field("name"));
    assert!(issues.has_field("description"));
    assert!(!issues.has_field("builderName"));
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_approve_is_idempotent() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let pending = repo.insert(new_build("Sky Island", BuildStatus::Pending)).await.unwrap();
    let mut events = showcase.events.subscribe();

    let first = showcase.moderation.approve(pending.id).await.unwrap();
    let second = showcase.moderation.approve(pending.id).await.unwrap();
    assert_eq!(first.status, BuildStatus::Approved);
    assert_eq!(first, second);

    assert_eq!(events.recv().await.unwrap(), BuildEvent::Approved { id: pending.id });
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_delete_then_lookup_fails() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let build = repo.insert(new_build("Sky Island", BuildStatus::Approved)).await.unwrap();
    showcase.interaction.comment(build.id, "Al", "Nice work").await.unwrap();

    showcase.moderation.delete(build.id).await.unwrap();

    assert!(matches!(
        showcase.gallery.detail(build.id).await,
        Err(DomainError::NotFound(id)) if id == build.id
    ));
    assert!(repo.list().await.unwrap().is_empty());
    assert!(matches!(
        showcase.moderation.delete(build.id).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_likes_are_all_counted() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let build = repo.insert(new_build("Sky Island", BuildStatus::Approved)).await.unwrap();

    let tasks: Vec<_> = (0..25)
        .map(|_| {
            let showcase = showcase.clone();
            tokio::spawn(async move { showcase.interaction.like(build.id).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(repo.get(build.id).await.unwrap().likes, 25);
}

#[tokio::test]
async fn test_comment_length_boundaries() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let build = repo.insert(new_build("Sky Island", BuildStatus::Approved)).await.unwrap();

    let author_err = showcase.interaction.comment(build.id, "A", "Hi!").await.unwrap_err();
    assert!(matches!(
        author_err,
        DomainError::Validation(ref v) if v.has_field("author") && !v.has_field("text")
    ));

    let text_err = showcase.interaction.comment(build.id, "Al", "Hi").await.unwrap_err();
    assert!(matches!(
        text_err,
        DomainError::Validation(ref v) if v.has_field("text") && !v.has_field("author")
    ));

    showcase.interaction.comment(build.id, "Al", "Hi!").await.unwrap();
    let latest = showcase.interaction.comment(build.id, "Bo", "Second!").await.unwrap();
    let authors: Vec<&str> = latest.comments.iter().map(|c| c.author.as_str()).collect();
    assert_eq!(authors, vec!["Bo", "Al"]);
}

#[tokio::test]
async fn test_search_only_returns_approved_matches() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let approved = repo.insert(new_build("Royal Castle", BuildStatus::Approved)).await.unwrap();
    repo.insert(new_build("Castle Ruins", BuildStatus::Pending)).await.unwrap();
    repo.insert(new_build("Wheat Farm", BuildStatus::Approved)).await.unwrap();

    let found = showcase.gallery.search(Some("castle")).await.unwrap();
    assert_eq!(found, vec![approved]);

    let everything = showcase.gallery.search(Some("   ")).await.unwrap();
    assert_eq!(everything.len(), 2);
    assert!(everything.iter().all(|b| b.status == BuildStatus::Approved));
}
