//! Shared world state for board sync BDD scenarios.

use crate::test_helpers::{SyncFixture, TestDispatcher, TestImporter};
use cardbridge::sync::services::{DispatchReport, ImportSummary};
use rstest::fixture;

/// Scenario world for board sync behaviour tests.
pub struct BoardSyncWorld {
    pub fixture: SyncFixture,
    pub dispatcher: TestDispatcher,
    pub importer: TestImporter,
    pub last_summary: Option<ImportSummary>,
    pub last_report: Option<DispatchReport>,
}

impl BoardSyncWorld {
    /// Creates a world over an empty board.
    #[must_use]
    pub fn new() -> Self {
        let fixture = SyncFixture::new();
        let dispatcher = fixture.dispatcher();
        let importer = fixture.importer();
        Self {
            fixture,
            dispatcher,
            importer,
            last_summary: None,
            last_report: None,
        }
    }
}

impl Default for BoardSyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardSyncWorld {
    BoardSyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
