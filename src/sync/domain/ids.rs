//! Identifier types for board cards, board lists and tracker stories.

use super::SyncDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix appended to a card identifier to form its identity store key.
const LINK_KEY_SUFFIX: &str = "_created";

fn non_empty(value: impl Into<String>, kind: &'static str) -> Result<String, SyncDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncDomainError::EmptyIdentifier(kind));
    }
    Ok(trimmed.to_owned())
}

/// Opaque identifier of a card on the source board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceCardId(String);

impl SourceCardId {
    /// Creates a validated card identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, SyncDomainError> {
        non_empty(value, "source card").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identity store key for this card (`"{id}_created"`).
    #[must_use]
    pub fn link_key(&self) -> String {
        format!("{}{LINK_KEY_SUFFIX}", self.0)
    }
}

impl fmt::Display for SourceCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a list (column) on the source board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    /// Creates a validated list identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, SyncDomainError> {
        non_empty(value, "board list").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned to a story by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetItemId(String);

impl TargetItemId {
    /// Creates a validated tracker story identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, SyncDomainError> {
        non_empty(value, "target item").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
