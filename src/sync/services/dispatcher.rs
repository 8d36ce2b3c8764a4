//! Event dispatcher applying board change events to the tracker.

use super::{
    FieldTranslator, SyncServiceError, SyncServiceResult,
    materializer::{Materialization, Materializer},
};
use crate::sync::{
    domain::{ChangeEvent, ItemPayload, LinkRecord, SourceCardId, SyncDomainError, TargetItemId},
    ports::{DeleteOutcome, IdentityStore, SourceBoard, TargetTracker},
};
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Processing phase of a single change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    /// The event was accepted for processing.
    Received,
    /// A tracker payload was built.
    Translated,
    /// The payload was sent to the tracker.
    Applied,
    /// The linked story is being deleted.
    Deleting,
    /// Processing finished.
    Done,
    /// Processing stopped on an error.
    Failed,
}

/// Why an event finished without touching the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The card's list has no state mapping.
    UnmappableColumn(String),
    /// The card was restored from the archive.
    Unarchived,
    /// Another worker already reserved or linked the card.
    AlreadyReserved,
    /// The notification describes a change that is not mirrored.
    NotMirrored,
    /// The card has no linked story to update.
    NotLinked,
}

/// What a processed event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A linked story was updated.
    Updated {
        /// Updated story.
        target_id: TargetItemId,
        /// Fields sent.
        payload: ItemPayload,
    },
    /// The card had no story yet and one was created.
    Created(LinkRecord),
    /// The card was archived and its story deleted.
    Deleted {
        /// Linked story, if the card was ever materialized.
        target_id: Option<TargetItemId>,
        /// Tracker-side result.
        outcome: DeleteOutcome,
    },
    /// The event was skipped.
    Skipped(SkipReason),
    /// The notification was malformed and dropped.
    Dropped(String),
}

/// Phase trail and outcome of a successfully processed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    phases: Vec<DispatchPhase>,
    outcome: DispatchOutcome,
}

impl DispatchReport {
    /// Returns the phases traversed, in order.
    #[must_use]
    pub fn phases(&self) -> &[DispatchPhase] {
        &self.phases
    }

    /// Returns the outcome.
    #[must_use]
    pub const fn outcome(&self) -> &DispatchOutcome {
        &self.outcome
    }

    /// Returns the terminal phase.
    #[must_use]
    pub fn final_phase(&self) -> Option<DispatchPhase> {
        self.phases.last().copied()
    }
}

/// A raw webhook notification waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    delivery_id: Uuid,
    body: Vec<u8>,
}

impl Notification {
    /// Wraps a notification body with a fresh delivery id.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            delivery_id: Uuid::new_v4(),
            body: body.into(),
        }
    }

    /// Returns the delivery id used to correlate log lines.
    #[must_use]
    pub const fn delivery_id(&self) -> Uuid {
        self.delivery_id
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

struct PhaseTrail {
    phases: Vec<DispatchPhase>,
}

impl PhaseTrail {
    fn received() -> Self {
        Self {
            phases: vec![DispatchPhase::Received],
        }
    }

    fn advance(&mut self, phase: DispatchPhase) {
        debug!(?phase, "dispatch phase");
        self.phases.push(phase);
    }

    fn finish(mut self, outcome: DispatchOutcome) -> DispatchReport {
        self.advance(DispatchPhase::Done);
        DispatchReport {
            phases: self.phases,
            outcome,
        }
    }

    fn fail(mut self, err: &SyncServiceError) {
        self.advance(DispatchPhase::Failed);
        warn!(phases = ?self.phases, error = %err, "dispatch failed");
    }
}

enum Translation {
    Payload(ItemPayload),
    Skip(SkipReason),
}

/// Applies board change events to the tracker, one event at a time.
///
/// Card updates are sent to the story linked in the identity store. Only a
/// card creation event materializes a new story; updates for a card with no
/// link are skipped.
pub struct EventDispatcher<S, T, I, C>
where
    S: SourceBoard,
    T: TargetTracker,
    I: IdentityStore,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    materializer: Materializer<T, I, C>,
}

impl<S, T, I, C> EventDispatcher<S, T, I, C>
where
    S: SourceBoard,
    T: TargetTracker,
    I: IdentityStore,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(
        source: Arc<S>,
        target: Arc<T>,
        identity: Arc<I>,
        clock: Arc<C>,
        translator: FieldTranslator,
    ) -> Self {
        Self {
            source,
            materializer: Materializer::new(target, identity, clock, translator),
        }
    }

    /// Processes one change event.
    ///
    /// Unmappable columns, restored cards and already-reserved cards are
    /// skipped rather than reported as errors.
    ///
    /// # Errors
    ///
    /// Returns [`SyncServiceError`] when an identity store or API call
    /// fails. The event is not retried.
    pub async fn dispatch(&self, event: ChangeEvent) -> SyncServiceResult<DispatchReport> {
        let mut trail = PhaseTrail::received();
        debug!(card_id = %event.card_id(), field = %event.field(), "dispatching change event");
        match self.drive(event, &mut trail).await {
            Ok(outcome) => Ok(trail.finish(outcome)),
            Err(err) => {
                trail.fail(&err);
                Err(err)
            }
        }
    }

    /// Decodes and processes a raw webhook notification.
    ///
    /// Malformed notifications are logged and reported as
    /// [`DispatchOutcome::Dropped`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncServiceError`] when processing a well-formed event
    /// fails.
    pub async fn dispatch_notification(&self, body: &[u8]) -> SyncServiceResult<DispatchReport> {
        match ChangeEvent::from_notification(body) {
            Ok(Some(event)) => self.dispatch(event).await,
            Ok(None) => {
                debug!("notification does not describe a mirrored change");
                Ok(PhaseTrail::received().finish(DispatchOutcome::Skipped(SkipReason::NotMirrored)))
            }
            Err(err) => {
                warn!(error = %err, "dropping malformed notification");
                Ok(PhaseTrail::received().finish(DispatchOutcome::Dropped(err.to_string())))
            }
        }
    }

    /// Drains notifications in arrival order until the channel closes.
    ///
    /// A failing notification is logged and never stops the loop.
    pub async fn run(&self, mut receiver: mpsc::Receiver<Notification>) {
        info!("dispatcher started");
        while let Some(notification) = receiver.recv().await {
            let span = info_span!("notification", delivery_id = %notification.delivery_id());
            async {
                match self.dispatch_notification(notification.body()).await {
                    Ok(report) => info!(outcome = ?report.outcome(), "notification processed"),
                    Err(err) => error!(error = %err, "notification failed"),
                }
            }
            .instrument(span)
            .await;
        }
        info!("notification channel closed; dispatcher stopping");
    }

    async fn drive(
        &self,
        event: ChangeEvent,
        trail: &mut PhaseTrail,
    ) -> SyncServiceResult<DispatchOutcome> {
        match event {
            ChangeEvent::ClosedChanged {
                card_id,
                closed: true,
            } => {
                trail.advance(DispatchPhase::Deleting);
                self.delete_story(&card_id).await
            }
            ChangeEvent::ClosedChanged {
                card_id,
                closed: false,
            } => {
                info!(%card_id, "card restored from archive; not recreating its story");
                Ok(DispatchOutcome::Skipped(SkipReason::Unarchived))
            }
            ChangeEvent::Created { card_id } => self.create_story(&card_id, trail).await,
            update => self.update_story(&update, trail).await,
        }
    }

    async fn update_story(
        &self,
        event: &ChangeEvent,
        trail: &mut PhaseTrail,
    ) -> SyncServiceResult<DispatchOutcome> {
        let card_id = event.card_id();
        let Some(link) = self.materializer.identity().find(card_id).await? else {
            warn!(%card_id, field = %event.field(), "card has no linked story; skipping update");
            return Ok(DispatchOutcome::Skipped(SkipReason::NotLinked));
        };

        let payload = match self.translate(event).await? {
            Translation::Payload(payload) => payload,
            Translation::Skip(reason) => return Ok(DispatchOutcome::Skipped(reason)),
        };
        trail.advance(DispatchPhase::Translated);

        let target_id = link.target_id().clone();
        self.materializer
            .target()
            .update_item(&target_id, &payload)
            .await?;
        trail.advance(DispatchPhase::Applied);
        info!(%card_id, %target_id, field = %event.field(), "updated tracker story");
        Ok(DispatchOutcome::Updated { target_id, payload })
    }

    async fn translate(&self, event: &ChangeEvent) -> SyncServiceResult<Translation> {
        let translator = self.materializer.translator();
        let now = self.materializer.clock().utc();
        let payload = match event {
            ChangeEvent::NameChanged { name, .. } => FieldTranslator::name_payload(name),
            ChangeEvent::DescriptionChanged { description, .. } => {
                FieldTranslator::description_payload(description)
            }
            ChangeEvent::DueDateChanged { due, .. } => translator.due_payload(*due, now),
            ChangeEvent::ColumnChanged { card_id, column } => {
                let state = match translator.state_for_column(column) {
                    Ok(state) => state,
                    Err(SyncDomainError::UnmappableColumn(unmapped)) => {
                        warn!(%card_id, column = %unmapped, "no tracker state for column; skipping");
                        return Ok(Translation::Skip(SkipReason::UnmappableColumn(unmapped)));
                    }
                    Err(err) => return Err(err.into()),
                };
                // The webhook does not carry the due date on list moves.
                let due = if state.carries_estimate() {
                    self.source.card(card_id).await?.due()
                } else {
                    None
                };
                translator.column_payload(state, due, now)
            }
            ChangeEvent::LabelsChanged { card_id } => {
                // The webhook only names the touched label, not the full set.
                let card = self.source.card(card_id).await?;
                FieldTranslator::labels_payload(card.labels())
            }
            ChangeEvent::Created { .. } | ChangeEvent::ClosedChanged { .. } => {
                return Ok(Translation::Skip(SkipReason::NotMirrored));
            }
        };
        Ok(Translation::Payload(payload))
    }

    async fn create_story(
        &self,
        card_id: &SourceCardId,
        trail: &mut PhaseTrail,
    ) -> SyncServiceResult<DispatchOutcome> {
        let board_card = self.source.card(card_id).await?;
        let column = self.source.list_name(board_card.list_id()).await?;
        let card = board_card.into_source_card(column);

        match self.materializer.materialize(&card).await {
            Ok(Materialization::Created(link)) => {
                trail.advance(DispatchPhase::Translated);
                trail.advance(DispatchPhase::Applied);
                Ok(DispatchOutcome::Created(link))
            }
            Ok(Materialization::AlreadyHeld) => {
                info!(%card_id, "card already reserved by another worker; skipping");
                Ok(DispatchOutcome::Skipped(SkipReason::AlreadyReserved))
            }
            Err(SyncServiceError::Domain(SyncDomainError::UnmappableColumn(column))) => {
                warn!(%card_id, %column, "no tracker state for column; not creating story");
                Ok(DispatchOutcome::Skipped(SkipReason::UnmappableColumn(column)))
            }
            Err(err) => Err(err),
        }
    }

    async fn delete_story(&self, card_id: &SourceCardId) -> SyncServiceResult<DispatchOutcome> {
        let Some(link) = self.materializer.identity().find(card_id).await? else {
            info!(%card_id, "archived card has no story; nothing to delete");
            return Ok(DispatchOutcome::Deleted {
                target_id: None,
                outcome: DeleteOutcome::AlreadyGone,
            });
        };

        let target_id = link.target_id().clone();
        let outcome = self.materializer.target().delete_item(&target_id).await?;
        match outcome {
            DeleteOutcome::Deleted => info!(%card_id, %target_id, "deleted tracker story"),
            DeleteOutcome::AlreadyGone => {
                info!(%card_id, %target_id, "tracker story was already deleted");
            }
        }
        Ok(DispatchOutcome::Deleted {
            target_id: Some(target_id),
            outcome,
        })
    }
}
