//! Orchestration services for board-to-tracker synchronization.
//!
//! The [`EventDispatcher`] applies live change events and the
//! [`BoardImporter`] reconciles a whole board. Both create stories through
//! the same reserve-then-create path, so a card is never mirrored twice.

mod dispatcher;
mod error;
mod importer;
mod materializer;
mod translator;

pub use dispatcher::{
    DispatchOutcome, DispatchPhase, DispatchReport, EventDispatcher, Notification, SkipReason,
};
pub use error::{SyncServiceError, SyncServiceResult};
pub use importer::{BoardImporter, ImportSummary};
pub use translator::{ColumnMap, FieldTranslator};
