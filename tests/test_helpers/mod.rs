//! Shared fixtures for integration tests.

use cardbridge::sync::{
    adapters::memory::{InMemoryIdentityStore, InMemorySourceBoard, RecordingTargetTracker},
    domain::{BoardCard, EstimatePolicy, ItemState, ListId, SourceCardId},
    services::{BoardImporter, ColumnMap, EventDispatcher, FieldTranslator},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Dispatcher wired to the in-memory adapters.
pub type TestDispatcher =
    EventDispatcher<InMemorySourceBoard, RecordingTargetTracker, InMemoryIdentityStore, FixedClock>;

/// Importer wired to the in-memory adapters.
pub type TestImporter =
    BoardImporter<InMemorySourceBoard, RecordingTargetTracker, InMemoryIdentityStore, FixedClock>;

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

/// 2026-05-04 08:30 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Builds a card id, panicking on blank input.
pub fn card_id(raw: &str) -> SourceCardId {
    SourceCardId::new(raw).expect("valid card id")
}

/// Board with lists `To Do`, `Doing`, `Done` and `Backlog`, plus the
/// tracker and identity store the services write to.
pub struct SyncFixture {
    pub board: Arc<InMemorySourceBoard>,
    pub tracker: Arc<RecordingTargetTracker>,
    pub identity: Arc<InMemoryIdentityStore>,
    pub clock: Arc<FixedClock>,
}

/// `To Do` and `Doing` map to unstarted, `Done` to finished; `Backlog` is
/// unmapped.
pub fn translator() -> FieldTranslator {
    FieldTranslator::new(
        ColumnMap::new()
            .with_column("To Do", ItemState::Unstarted)
            .with_column("Doing", ItemState::Unstarted)
            .with_column("Done", ItemState::Finished),
        EstimatePolicy::ElapsedDays,
    )
}

impl SyncFixture {
    /// Creates the fixture with an empty board.
    pub fn new() -> Self {
        let board = InMemorySourceBoard::new();
        for name in ["To Do", "Doing", "Done", "Backlog"] {
            board
                .put_list(Self::list_for(name), name)
                .expect("list stored");
        }
        Self {
            board: Arc::new(board),
            tracker: Arc::new(RecordingTargetTracker::new()),
            identity: Arc::new(InMemoryIdentityStore::new()),
            clock: Arc::new(FixedClock(now())),
        }
    }

    /// Returns the id of the named list.
    pub fn list_for(name: &str) -> ListId {
        ListId::new(format!("list-{}", name.to_lowercase().replace(' ', "-"))).expect("valid list id")
    }

    /// Places a card on the named list, replacing any earlier version.
    pub fn put_card(&self, id: &str, name: &str, list: &str, due: Option<DateTime<Utc>>) {
        self.board
            .put_card(BoardCard::new(card_id(id), name, Self::list_for(list)).with_due(due))
            .expect("card stored");
    }

    /// Builds a dispatcher over the fixture's adapters.
    pub fn dispatcher(&self) -> TestDispatcher {
        EventDispatcher::new(
            Arc::clone(&self.board),
            Arc::clone(&self.tracker),
            Arc::clone(&self.identity),
            Arc::clone(&self.clock),
            translator(),
        )
    }

    /// Builds an importer over the fixture's adapters.
    pub fn importer(&self) -> TestImporter {
        BoardImporter::new(
            Arc::clone(&self.board),
            Arc::clone(&self.tracker),
            Arc::clone(&self.identity),
            Arc::clone(&self.clock),
            translator(),
        )
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps an action in the webhook envelope.
pub fn notification(action: &serde_json::Value) -> Vec<u8> {
    serde_json::json!({ "action": action }).to_string().into_bytes()
}
