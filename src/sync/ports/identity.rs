//! Identity store port recording which cards already have tracker stories.

use crate::sync::domain::{LinkRecord, Reservation, SourceCardId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity store operations.
pub type IdentityStoreResult<T> = Result<T, IdentityStoreError>;

/// Durable card-to-story link contract.
///
/// Each card is keyed as `"{source_id}_created"`. An entry is first
/// *reserved* (creation in flight) and then *linked* once the tracker has
/// assigned a story id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns `true` when the card is reserved or linked.
    async fn exists(&self, source_id: &SourceCardId) -> IdentityStoreResult<bool>;

    /// Atomically reserves the card for story creation.
    ///
    /// Exactly one caller observes [`Reservation::Acquired`] for a given
    /// card, no matter how many race for it; all others observe
    /// [`Reservation::Held`].
    async fn reserve(
        &self,
        source_id: &SourceCardId,
        card_name: &str,
    ) -> IdentityStoreResult<Reservation>;

    /// Records the story created for a card.
    ///
    /// Recording does not require a prior reservation.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::AlreadyLinked`] when the card already
    /// has a story.
    async fn record(&self, link: &LinkRecord) -> IdentityStoreResult<()>;

    /// Finds the link for a card.
    ///
    /// Returns `None` while the card is unknown or only reserved.
    async fn find(&self, source_id: &SourceCardId) -> IdentityStoreResult<Option<LinkRecord>>;

    /// Drops an unlinked reservation so creation can be retried later.
    ///
    /// Linked entries are left untouched.
    async fn release(&self, source_id: &SourceCardId) -> IdentityStoreResult<()>;
}

/// Errors returned by identity store implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityStoreError {
    /// The card already has a story.
    #[error("card {0} is already linked to a tracker story")]
    AlreadyLinked(SourceCardId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
