//! HTTP mutations announce the views they invalidate.

use api_adapters::{build_router, AppState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use domains::{ApprovalPolicy, BuildEvent, BuildRepository, BuildStatus, View};
use integration_tests::{new_build, offline_showcase};
use tower::ServiceExt;

fn post(uri: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_like_over_http_invalidates_detail_view() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let build = repo.insert(new_build("Sky Island", BuildStatus::Approved)).await.unwrap();
    let mut events = showcase.events.subscribe();
    let app = build_router(AppState::new(showcase, None));

    let response = app
        .oneshot(post(format!("/api/builds/{}/likes", build.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = events.recv().await.unwrap();
    assert_eq!(event, BuildEvent::Liked { id: build.id, likes: 1 });
    assert_eq!(event.affected_views(), vec![View::Detail { id: build.id }]);
}

#[tokio::test]
async fn test_approve_over_http_invalidates_every_view() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let build = repo.insert(new_build("Sky Island", BuildStatus::Pending)).await.unwrap();
    let mut events = showcase.events.subscribe();
    let app = build_router(AppState::new(showcase, None));

    let response = app
        .oneshot(post(format!("/api/admin/builds/{}/approve", build.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let paths: Vec<String> = events
        .recv()
        .await
        .unwrap()
        .affected_views()
        .iter()
        .map(View::path)
        .collect();
    assert_eq!(paths, vec!["/".to_string(), "/admin".to_string(), format!("/build/{}", build.id)]);
}

#[tokio::test]
async fn test_failed_request_publishes_nothing() {
    let (showcase, _) = offline_showcase(ApprovalPolicy::RequireApproval);
    let mut events = showcase.events.subscribe();
    let app = build_router(AppState::new(showcase, None));

    let response = app
        .oneshot(post(format!("/api/builds/{}/likes", domains::BuildId::new())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_delete_over_http_invalidates_detail_view() {
    let (showcase, repo) = offline_showcase(ApprovalPolicy::RequireApproval);
    let build = repo.insert(new_build("Sky Island", BuildStatus::Approved)).await.unwrap();
    let mut events = showcase.events.subscribe();
    let app = build_router(AppState::new(showcase, None));

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/admin/builds/{}", build.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let event = events.recv().await.unwrap();
    assert_eq!(event, BuildEvent::Deleted { id: build.id });
    assert!(event.affected_views().contains(&View::Detail { id: build.id }));
    assert!(event.affected_views().contains(&View::Gallery));
}
