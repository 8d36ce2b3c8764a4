//! Links between board cards and the tracker stories created from them.

use super::{SourceCardId, TargetItemId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Durable proof that a card has been materialized as a tracker story.
///
/// A card has at most one link. Links are never mutated or deleted by the
/// sync engine, even after the story is deleted on archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    source_id: SourceCardId,
    target_id: TargetItemId,
    card_name: String,
    created_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Creates a link stamped with the current clock time.
    #[must_use]
    pub fn new(
        source_id: SourceCardId,
        target_id: TargetItemId,
        card_name: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::from_persisted(source_id, target_id, card_name, clock.utc())
    }

    /// Reconstructs a link from persisted storage.
    #[must_use]
    pub fn from_persisted(
        source_id: SourceCardId,
        target_id: TargetItemId,
        card_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_id,
            target_id,
            card_name: card_name.into(),
            created_at,
        }
    }

    /// Returns the linked card identifier.
    #[must_use]
    pub const fn source_id(&self) -> &SourceCardId {
        &self.source_id
    }

    /// Returns the linked story identifier.
    #[must_use]
    pub const fn target_id(&self) -> &TargetItemId {
        &self.target_id
    }

    /// Returns the card name captured when the link was made.
    #[must_use]
    pub fn card_name(&self) -> &str {
        &self.card_name
    }

    /// Returns the link creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of atomically reserving a card for creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The caller holds the reservation and must create the story.
    Acquired,
    /// Another caller already reserved or linked the card.
    Held,
}
