//! Notifications flowing from the webhook router to the tracker.

use crate::test_helpers::{SyncFixture, notification};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use cardbridge::{sync::adapters::memory::TrackerCall, webhook};
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

#[rstest]
#[tokio::test]
async fn posted_notifications_reach_the_tracker_in_order() {
    let fixture = SyncFixture::new();
    fixture.put_card("c1", "Fix bug", "Doing", None);
    let dispatcher = fixture.dispatcher();
    let (sender, receiver) = webhook::notification_channel(8);
    let app = webhook::router(sender);

    let bodies = [
        notification(&json!({"type": "createCard", "data": {"card": {"id": "c1"}}})),
        b"{ not json".to_vec(),
        notification(&json!({
            "type": "updateCard",
            "data": {"old": {"desc": ""}, "card": {"id": "c1", "desc": "Steps to reproduce"}}
        })),
    ];
    for body in bodies {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/webhook")
                    .body(Body::from(body))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
    drop(app);

    dispatcher.run(receiver).await;

    let calls = fixture.tracker.calls().expect("calls readable");
    assert!(matches!(
        calls.as_slice(),
        [TrackerCall::Create(_), TrackerCall::Update(_, update)]
            if update.description() == Some("Steps to reproduce")
    ));
}
