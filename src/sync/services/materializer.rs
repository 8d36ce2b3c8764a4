//! Idempotent story creation shared by the dispatcher and the importer.

use super::{FieldTranslator, SyncServiceError, SyncServiceResult};
use crate::sync::{
    domain::{ItemPayload, LinkRecord, Reservation, SourceCard, SourceCardId},
    ports::{IdentityStore, TargetTracker},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of trying to materialize a card as a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Materialization {
    /// A story was created and linked.
    Created(LinkRecord),
    /// The card was already reserved or linked by someone else.
    AlreadyHeld,
}

/// Creates at most one story per card.
///
/// The card is reserved in the identity store before the tracker is
/// called, so concurrent or redelivered requests for the same card cannot
/// both create a story.
pub(crate) struct Materializer<T, I, C>
where
    T: TargetTracker,
    I: IdentityStore,
    C: Clock + Send + Sync,
{
    target: Arc<T>,
    identity: Arc<I>,
    clock: Arc<C>,
    translator: FieldTranslator,
}

impl<T, I, C> Materializer<T, I, C>
where
    T: TargetTracker,
    I: IdentityStore,
    C: Clock + Send + Sync,
{
    pub(crate) const fn new(
        target: Arc<T>,
        identity: Arc<I>,
        clock: Arc<C>,
        translator: FieldTranslator,
    ) -> Self {
        Self {
            target,
            identity,
            clock,
            translator,
        }
    }

    pub(crate) const fn translator(&self) -> &FieldTranslator {
        &self.translator
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn identity(&self) -> &I {
        &self.identity
    }

    pub(crate) fn target(&self) -> &T {
        &self.target
    }

    /// Builds the creation payload, reserves the card, creates the story
    /// and records the link.
    ///
    /// An unmappable column fails before anything is reserved. A failed
    /// tracker call releases the reservation so the card can be retried.
    pub(crate) async fn materialize(
        &self,
        card: &SourceCard,
    ) -> SyncServiceResult<Materialization> {
        let payload = self.translator.creation_payload(card, self.clock.utc())?;

        if self.identity.reserve(card.id(), card.name()).await? == Reservation::Held {
            return Ok(Materialization::AlreadyHeld);
        }

        let link = self.create_and_record(card, &payload).await?;
        info!(
            card_id = %link.source_id(),
            target_id = %link.target_id(),
            "created tracker story for card"
        );
        Ok(Materialization::Created(link))
    }

    async fn create_and_record(
        &self,
        card: &SourceCard,
        payload: &ItemPayload,
    ) -> SyncServiceResult<LinkRecord> {
        let target_id = match self.target.create_item(payload).await {
            Ok(target_id) => target_id,
            Err(err) => {
                self.release(card.id()).await;
                return Err(err.into());
            }
        };

        let link = LinkRecord::new(card.id().clone(), target_id, card.name(), &*self.clock);
        // The story exists now; keep the reservation even if recording
        // fails so a retry cannot create a second story.
        self.identity.record(&link).await.map_err(|err| {
            error!(
                card_id = %card.id(),
                target_id = %link.target_id(),
                error = %err,
                "story created but link could not be recorded"
            );
            SyncServiceError::from(err)
        })?;
        Ok(link)
    }

    async fn release(&self, card_id: &SourceCardId) {
        if let Err(err) = self.identity.release(card_id).await {
            warn!(%card_id, error = %err, "could not release card reservation");
        }
    }
}
