//! Write port onto the target tracker.

use super::TransportResult;
use crate::sync::domain::{ItemPayload, TargetItemId};
use async_trait::async_trait;

/// Result of deleting a tracker story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The story existed and was deleted.
    Deleted,
    /// The story was already gone.
    AlreadyGone,
}

/// Tracker API contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetTracker: Send + Sync {
    /// Creates a story and returns the id the tracker assigned.
    async fn create_item(&self, payload: &ItemPayload) -> TransportResult<TargetItemId>;

    /// Applies a partial update to a story.
    async fn update_item(&self, id: &TargetItemId, payload: &ItemPayload) -> TransportResult<()>;

    /// Deletes a story. Deleting an unknown story is not an error.
    async fn delete_item(&self, id: &TargetItemId) -> TransportResult<DeleteOutcome>;
}
