//! Change events applied through the public API.

use crate::test_helpers::{SyncFixture, card_id, notification, now};
use cardbridge::sync::{
    adapters::memory::TrackerCall,
    domain::{Estimate, ItemState, SourceCard},
    ports::DeleteOutcome,
    services::{DispatchOutcome, SkipReason},
};
use chrono::Duration;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn fixture() -> SyncFixture {
    SyncFixture::new()
}

#[rstest]
#[tokio::test]
async fn imported_card_follows_its_board_changes(fixture: SyncFixture) {
    fixture.put_card("c1", "Fix bug", "Doing", None);
    let summary = fixture
        .importer()
        .import_board(vec![SourceCard::new(card_id("c1"), "Fix bug", "Doing")])
        .await;
    let [(_, story_id)] = summary.created() else {
        panic!("expected one created story");
    };
    let dispatcher = fixture.dispatcher();

    fixture.put_card("c1", "Fix bug", "Done", Some(now() + Duration::days(3)));
    let moved = notification(&json!({
        "type": "updateCard",
        "data": {
            "old": {"idList": "list-doing"},
            "card": {"id": "c1"},
            "listAfter": {"name": "Done"}
        }
    }));
    dispatcher
        .dispatch_notification(&moved)
        .await
        .expect("move applied");

    let story = fixture
        .tracker
        .story(story_id)
        .expect("story readable")
        .expect("story exists");
    assert_eq!(story.state(), Some(ItemState::Finished));
    assert_eq!(story.estimate(), Some(Estimate::TWO));
    assert_eq!(story.name(), Some("Fix bug"));
}

#[rstest]
#[tokio::test]
async fn redelivered_create_notification_creates_one_story(fixture: SyncFixture) {
    fixture.put_card("c7", "Onboarding", "To Do", None);
    let dispatcher = fixture.dispatcher();
    let created = notification(&json!({"type": "createCard", "data": {"card": {"id": "c7"}}}));

    let first = dispatcher
        .dispatch_notification(&created)
        .await
        .expect("first delivery");
    let second = dispatcher
        .dispatch_notification(&created)
        .await
        .expect("second delivery");

    assert!(matches!(first.outcome(), DispatchOutcome::Created(_)));
    assert_eq!(
        second.outcome(),
        &DispatchOutcome::Skipped(SkipReason::AlreadyReserved)
    );
    let calls = fixture.tracker.calls().expect("calls readable");
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, TrackerCall::Create(_)))
            .count(),
        1
    );
}

#[rstest]
#[tokio::test]
async fn archived_card_loses_its_story(fixture: SyncFixture) {
    fixture.put_card("c1", "Fix bug", "Doing", None);
    let dispatcher = fixture.dispatcher();
    let archive = notification(&json!({
        "type": "updateCard",
        "data": {"old": {"closed": false}, "card": {"id": "c1", "closed": true}}
    }));
    dispatcher
        .dispatch_notification(&notification(&json!({
            "type": "createCard", "data": {"card": {"id": "c1"}}
        })))
        .await
        .expect("card created");

    let first = dispatcher
        .dispatch_notification(&archive)
        .await
        .expect("archive applied");
    let again = dispatcher
        .dispatch_notification(&archive)
        .await
        .expect("repeat is harmless");

    assert!(matches!(
        first.outcome(),
        DispatchOutcome::Deleted {
            outcome: DeleteOutcome::Deleted,
            ..
        }
    ));
    assert!(matches!(
        again.outcome(),
        DispatchOutcome::Deleted {
            outcome: DeleteOutcome::AlreadyGone,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn card_moved_to_unmapped_list_keeps_its_state(fixture: SyncFixture) {
    fixture.put_card("c1", "Fix bug", "Doing", None);
    let dispatcher = fixture.dispatcher();
    dispatcher
        .dispatch_notification(&notification(&json!({
            "type": "createCard", "data": {"card": {"id": "c1"}}
        })))
        .await
        .expect("card created");

    let report = dispatcher
        .dispatch_notification(&notification(&json!({
            "type": "updateCard",
            "data": {
                "old": {"idList": "list-doing"},
                "card": {"id": "c1"},
                "listAfter": {"name": "Backlog"}
            }
        })))
        .await
        .expect("dispatch succeeds");

    assert_eq!(
        report.outcome(),
        &DispatchOutcome::Skipped(SkipReason::UnmappableColumn("Backlog".to_owned()))
    );
}
