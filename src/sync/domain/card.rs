//! Source board card snapshots.

use super::{ListId, SourceCardId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A card as listed on the board, before its list id is resolved to a
/// column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCard {
    id: SourceCardId,
    name: String,
    description: String,
    labels: BTreeSet<String>,
    list_id: ListId,
    due: Option<DateTime<Utc>>,
}

impl BoardCard {
    /// Creates a board card with required fields.
    #[must_use]
    pub fn new(id: SourceCardId, name: impl Into<String>, list_id: ListId) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            labels: BTreeSet::new(),
            list_id,
            due: None,
        }
    }

    /// Sets the card description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the card labels. Blank label names are dropped.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = normalize_labels(labels);
        self
    }

    /// Sets the card due date.
    #[must_use]
    pub const fn with_due(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due = due;
        self
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> &SourceCardId {
        &self.id
    }

    /// Returns the list the card sits in.
    #[must_use]
    pub const fn list_id(&self) -> &ListId {
        &self.list_id
    }

    /// Returns the card labels.
    #[must_use]
    pub const fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Returns the card due date, if any.
    #[must_use]
    pub const fn due(&self) -> Option<DateTime<Utc>> {
        self.due
    }

    /// Resolves the card into a [`SourceCard`] sitting in `column`.
    #[must_use]
    pub fn into_source_card(self, column: impl Into<String>) -> SourceCard {
        SourceCard {
            id: self.id,
            name: self.name,
            description: self.description,
            labels: self.labels,
            column: column.into(),
            due: self.due,
        }
    }
}

/// A card with its column resolved to the list name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCard {
    id: SourceCardId,
    name: String,
    description: String,
    labels: BTreeSet<String>,
    column: String,
    due: Option<DateTime<Utc>>,
}

impl SourceCard {
    /// Creates a card with required fields and no description, labels or
    /// due date.
    #[must_use]
    pub fn new(id: SourceCardId, name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            labels: BTreeSet::new(),
            column: column.into(),
            due: None,
        }
    }

    /// Sets the card description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the card labels. Blank label names are dropped.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = normalize_labels(labels);
        self
    }

    /// Sets the card due date.
    #[must_use]
    pub const fn with_due(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due = due;
        self
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> &SourceCardId {
        &self.id
    }

    /// Returns the card name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the card description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the card labels.
    #[must_use]
    pub const fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Returns the name of the list the card sits in.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the card due date, if any.
    #[must_use]
    pub const fn due(&self) -> Option<DateTime<Utc>> {
        self.due
    }
}

// Color-only board labels have empty names and have no tracker counterpart.
fn normalize_labels(labels: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    labels
        .into_iter()
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty())
        .collect()
}
