//! Then steps for board sync BDD scenarios.

use super::world::{BoardSyncWorld, run_async};
use crate::test_helpers::card_id;
use cardbridge::sync::{
    adapters::memory::TrackerCall,
    domain::{ItemPayload, ItemState},
    ports::{DeleteOutcome, IdentityStore},
    services::DispatchOutcome,
};
use rstest_bdd_macros::then;

fn story_for(world: &BoardSyncWorld, card: &str) -> Result<Option<ItemPayload>, eyre::Report> {
    let link = run_async(world.fixture.identity.find(&card_id(card)))?
        .ok_or_else(|| eyre::eyre!("card {card} has no story link"))?;
    Ok(world.fixture.tracker.story(link.target_id())?)
}

#[then("the tracker received {count:usize} creation")]
fn creations_singular(world: &BoardSyncWorld, count: usize) -> Result<(), eyre::Report> {
    expect_creations(world, count)
}

#[then("the tracker received {count:usize} creations")]
fn creations_plural(world: &BoardSyncWorld, count: usize) -> Result<(), eyre::Report> {
    expect_creations(world, count)
}

fn expect_creations(world: &BoardSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let created = world
        .fixture
        .tracker
        .calls()?
        .iter()
        .filter(|call| matches!(call, TrackerCall::Create(_)))
        .count();
    if created != count {
        return Err(eyre::eyre!("expected {count} creations, found {created}"));
    }
    Ok(())
}

#[then(r#"the story for "{card}" has state "{state}" and estimate {points:u8}"#)]
fn story_state_and_estimate(
    world: &BoardSyncWorld,
    card: String,
    state: String,
    points: u8,
) -> Result<(), eyre::Report> {
    let expected_state = ItemState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let story =
        story_for(world, &card)?.ok_or_else(|| eyre::eyre!("story for {card} is missing"))?;

    if story.state() != Some(expected_state) {
        return Err(eyre::eyre!(
            "expected state {expected_state}, found {:?}",
            story.state()
        ));
    }
    let estimate = story.estimate().map(|estimate| estimate.points());
    if estimate != Some(points) {
        return Err(eyre::eyre!("expected estimate {points}, found {estimate:?}"));
    }
    Ok(())
}

#[then("the last import skipped {count:usize} card")]
fn import_skipped(world: &BoardSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let summary = world
        .last_summary
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing import summary"))?;
    if summary.skipped().len() != count {
        return Err(eyre::eyre!(
            "expected {count} skipped cards, found {:?}",
            summary.skipped()
        ));
    }
    Ok(())
}

#[then(r#"the story for "{card}" is deleted"#)]
fn story_deleted(world: &BoardSyncWorld, card: String) -> Result<(), eyre::Report> {
    if story_for(world, &card)?.is_some() {
        return Err(eyre::eyre!("story for {card} still exists"));
    }
    expect_delete_outcome(world, DeleteOutcome::Deleted)
}

#[then("the last deletion found the story already gone")]
fn deletion_already_gone(world: &BoardSyncWorld) -> Result<(), eyre::Report> {
    expect_delete_outcome(world, DeleteOutcome::AlreadyGone)
}

fn expect_delete_outcome(
    world: &BoardSyncWorld,
    expected: DeleteOutcome,
) -> Result<(), eyre::Report> {
    match world.last_report.as_ref().map(|report| report.outcome()) {
        Some(DispatchOutcome::Deleted { outcome, .. }) if *outcome == expected => Ok(()),
        other => Err(eyre::eyre!("expected deletion {expected:?}, got {other:?}")),
    }
}

#[then("the notification is dropped")]
fn notification_dropped(world: &BoardSyncWorld) -> Result<(), eyre::Report> {
    match world.last_report.as_ref().map(|report| report.outcome()) {
        Some(DispatchOutcome::Dropped(_)) => Ok(()),
        other => Err(eyre::eyre!("expected a dropped notification, got {other:?}")),
    }
}
