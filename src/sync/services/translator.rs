//! Field translation from board cards to tracker story payloads.

use crate::sync::domain::{
    EstimatePolicy, ItemPayload, ItemState, SourceCard, SyncDomainError, estimate_from_due,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// Mapping from board list names to tracker story states.
///
/// Explicit entries win. A list without an entry maps to the state of the
/// same name (`"Started"` maps to `started`), so boards whose lists are
/// named after tracker states need no configuration. Lookups ignore case
/// and surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: HashMap<String, ItemState>,
}

fn normalize(column: &str) -> String {
    column.trim().to_lowercase()
}

impl ColumnMap {
    /// Creates a map with no explicit entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an explicit list-name mapping.
    #[must_use]
    pub fn with_column(mut self, column: &str, state: ItemState) -> Self {
        self.entries.insert(normalize(column), state);
        self
    }

    /// Resolves a list name to a story state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::UnmappableColumn`] when the list has no
    /// entry and is not named after a state.
    pub fn resolve(&self, column: &str) -> Result<ItemState, SyncDomainError> {
        if let Some(state) = self.entries.get(&normalize(column)) {
            return Ok(*state);
        }
        ItemState::try_from(column)
            .map_err(|_| SyncDomainError::UnmappableColumn(column.to_owned()))
    }
}

/// Builds tracker payloads for each kind of card change.
///
/// All methods are pure; "now" and any freshly fetched card data are
/// supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTranslator {
    columns: ColumnMap,
    policy: EstimatePolicy,
}

impl FieldTranslator {
    /// Creates a translator.
    #[must_use]
    pub const fn new(columns: ColumnMap, policy: EstimatePolicy) -> Self {
        Self { columns, policy }
    }

    /// Returns the estimate policy in use.
    #[must_use]
    pub const fn policy(&self) -> EstimatePolicy {
        self.policy
    }

    /// Resolves the story state for a list name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::UnmappableColumn`] for unmapped lists.
    pub fn state_for_column(&self, column: &str) -> Result<ItemState, SyncDomainError> {
        self.columns.resolve(column)
    }

    /// Payload for a rename.
    #[must_use]
    pub fn name_payload(name: &str) -> ItemPayload {
        ItemPayload::new().with_name(name)
    }

    /// Payload for a description edit.
    #[must_use]
    pub fn description_payload(description: &str) -> ItemPayload {
        ItemPayload::new().with_description(description)
    }

    /// Payload for a label change, carrying the full current label set.
    #[must_use]
    pub fn labels_payload(labels: &BTreeSet<String>) -> ItemPayload {
        ItemPayload::new().with_labels(labels)
    }

    /// Payload for a due date change. A cleared due date estimates zero.
    #[must_use]
    pub fn due_payload(&self, due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ItemPayload {
        ItemPayload::new().with_estimate(estimate_from_due(due, now, self.policy))
    }

    /// Payload for a move to a list already resolved to `state`.
    ///
    /// `due` is only consulted for states that carry an estimate
    /// ([`ItemState::carries_estimate`]).
    #[must_use]
    pub fn column_payload(
        &self,
        state: ItemState,
        due: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ItemPayload {
        let payload = ItemPayload::new().with_state(state);
        if state.carries_estimate() {
            return payload.with_estimate(estimate_from_due(due, now, self.policy));
        }
        payload
    }

    /// Full payload for creating a story from a card.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::UnmappableColumn`] when the card's list
    /// has no state mapping.
    pub fn creation_payload(
        &self,
        card: &SourceCard,
        now: DateTime<Utc>,
    ) -> Result<ItemPayload, SyncDomainError> {
        let state = self.state_for_column(card.column())?;
        Ok(ItemPayload::new()
            .with_name(card.name())
            .with_description(card.description())
            .with_labels(card.labels())
            .with_state(state)
            .with_estimate(estimate_from_due(card.due(), now, self.policy)))
    }
}
