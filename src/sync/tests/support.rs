//! Shared fixtures for sync unit tests.

use crate::sync::{
    adapters::memory::{InMemoryIdentityStore, InMemorySourceBoard, RecordingTargetTracker},
    domain::{BoardCard, ItemState, ListId, SourceCardId},
    services::{ColumnMap, FieldTranslator},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2026-03-10 09:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    now() + chrono::Duration::days(days)
}

pub fn card_id(raw: &str) -> SourceCardId {
    SourceCardId::new(raw).expect("valid card id")
}

pub fn list_id(raw: &str) -> ListId {
    ListId::new(raw).expect("valid list id")
}

/// Board lists: `Doing` (unstarted), `Done` (finished), `Started` (by
/// name) and `Ideas` (unmapped).
pub fn translator() -> FieldTranslator {
    FieldTranslator::new(
        ColumnMap::new()
            .with_column("Doing", ItemState::Unstarted)
            .with_column("Done", ItemState::Finished),
        crate::sync::domain::EstimatePolicy::ElapsedDays,
    )
}

pub struct Harness {
    pub board: Arc<InMemorySourceBoard>,
    pub tracker: Arc<RecordingTargetTracker>,
    pub identity: Arc<InMemoryIdentityStore>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        let board = InMemorySourceBoard::new();
        for (id, name) in [
            ("l-doing", "Doing"),
            ("l-done", "Done"),
            ("l-started", "Started"),
            ("l-ideas", "Ideas"),
        ] {
            board.put_list(list_id(id), name).expect("list stored");
        }
        Self {
            board: Arc::new(board),
            tracker: Arc::new(RecordingTargetTracker::new()),
            identity: Arc::new(InMemoryIdentityStore::new()),
            clock: Arc::new(FixedClock(now())),
        }
    }

    pub fn put_card(&self, card: BoardCard) {
        self.board.put_card(card).expect("card stored");
    }
}
