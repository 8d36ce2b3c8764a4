//! Bulk import of a board snapshot.

use super::{
    FieldTranslator, SyncServiceError, SyncServiceResult,
    materializer::{Materialization, Materializer},
};
use crate::sync::{
    domain::{ListId, SourceCard, SourceCardId, SyncDomainError, TargetItemId},
    ports::{IdentityStore, SourceBoard, TargetTracker},
};
use mockable::Clock;
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

/// Per-card results of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    created: Vec<(SourceCardId, TargetItemId)>,
    skipped: Vec<SourceCardId>,
    unmapped: Vec<SourceCardId>,
    failed: Vec<(SourceCardId, String)>,
}

impl ImportSummary {
    /// Cards that got a new story, paired with that story.
    #[must_use]
    pub fn created(&self) -> &[(SourceCardId, TargetItemId)] {
        &self.created
    }

    /// Cards that were already reserved or linked.
    #[must_use]
    pub fn skipped(&self) -> &[SourceCardId] {
        &self.skipped
    }

    /// Cards whose list has no state mapping.
    #[must_use]
    pub fn unmapped(&self) -> &[SourceCardId] {
        &self.unmapped
    }

    /// Cards whose import failed, with the error message.
    #[must_use]
    pub fn failed(&self) -> &[(SourceCardId, String)] {
        &self.failed
    }

    /// Number of cards considered.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.len() + self.skipped.len() + self.unmapped.len() + self.failed.len()
    }
}

/// Creates stories for every card on a board that has none yet.
///
/// Re-running an import is safe: cards already reserved or linked are
/// skipped. One card failing does not stop the others.
pub struct BoardImporter<S, T, I, C>
where
    S: SourceBoard,
    T: TargetTracker,
    I: IdentityStore,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    materializer: Materializer<T, I, C>,
}

impl<S, T, I, C> BoardImporter<S, T, I, C>
where
    S: SourceBoard,
    T: TargetTracker,
    I: IdentityStore,
    C: Clock + Send + Sync,
{
    /// Creates an importer.
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

    /// Imports the given cards in order.
    pub async fn import_board(&self, cards: Vec<SourceCard>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for card in cards {
            let card_id = card.id().clone();
            match self.materializer.materialize(&card).await {
                Ok(Materialization::Created(link)) => {
                    summary.created.push((card_id, link.target_id().clone()));
                }
                Ok(Materialization::AlreadyHeld) => {
                    warn!(%card_id, name = card.name(), "card already exists in tracker; skipping");
                    summary.skipped.push(card_id);
                }
                Err(SyncServiceError::Domain(SyncDomainError::UnmappableColumn(column))) => {
                    warn!(%card_id, %column, "no tracker state for column; skipping card");
                    summary.unmapped.push(card_id);
                }
                Err(err) => {
                    warn!(%card_id, error = %err, "card import failed");
                    summary.failed.push((card_id, err.to_string()));
                }
            }
        }
        info!(
            created = summary.created.len(),
            skipped = summary.skipped.len(),
            unmapped = summary.unmapped.len(),
            failed = summary.failed.len(),
            "board import finished"
        );
        summary
    }

    /// Fetches the board snapshot and imports every card on it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncServiceError::Transport`] when the board cannot be
    /// listed or a list name cannot be resolved.
    pub async fn import_from_board(&self) -> SyncServiceResult<ImportSummary> {
        let board_cards = self.source.board_cards().await?;
        let mut list_names: HashMap<ListId, String> = HashMap::new();
        let mut cards = Vec::with_capacity(board_cards.len());
        for board_card in board_cards {
            let column = match list_names.get(board_card.list_id()) {
                Some(name) => name.clone(),
                None => {
                    let name = self.source.list_name(board_card.list_id()).await?;
                    list_names.insert(board_card.list_id().clone(), name.clone());
                    name
                }
            };
            cards.push(board_card.into_source_card(column));
        }
        info!(cards = cards.len(), "importing board snapshot");
        Ok(self.import_board(cards).await)
    }
}
