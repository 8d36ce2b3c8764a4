//! Domain model for board-to-tracker synchronization.
//!
//! Cards, stories, links and change events are plain values here. Nothing
//! in this module performs I/O; "now" is always passed in by the caller.

mod card;
mod error;
mod estimate;
mod event;
mod ids;
mod item;
mod link;

pub use card::{BoardCard, SourceCard};
pub use error::{ParseItemStateError, SyncDomainError};
pub use estimate::{EstimatePolicy, estimate_for_delta, estimate_from_due};
pub use event::{ChangeEvent, ChangedField};
pub use ids::{ListId, SourceCardId, TargetItemId};
pub use item::{Estimate, ItemPayload, ItemState};
pub use link::{LinkRecord, Reservation};
