//! Typed change events decoded from board webhook notifications.
//!
//! A board notification reports one changed field through the single key of
//! its `data.old` object. Decoding turns that convention into a sum type so
//! the dispatcher never inspects raw JSON.

use super::{SourceCardId, SyncDomainError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// A single-field change to a board card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The card was created on the board.
    Created {
        /// Card identifier.
        card_id: SourceCardId,
    },
    /// The card was renamed.
    NameChanged {
        /// Card identifier.
        card_id: SourceCardId,
        /// New card name.
        name: String,
    },
    /// The card moved to another list.
    ColumnChanged {
        /// Card identifier.
        card_id: SourceCardId,
        /// Name of the destination list.
        column: String,
    },
    /// The card description was edited.
    DescriptionChanged {
        /// Card identifier.
        card_id: SourceCardId,
        /// New description.
        description: String,
    },
    /// The card due date was set, moved or cleared.
    DueDateChanged {
        /// Card identifier.
        card_id: SourceCardId,
        /// New due date; `None` when cleared.
        due: Option<DateTime<Utc>>,
    },
    /// The card was archived or restored.
    ClosedChanged {
        /// Card identifier.
        card_id: SourceCardId,
        /// `true` when the card is now archived.
        closed: bool,
    },
    /// A label was added to or removed from the card.
    LabelsChanged {
        /// Card identifier.
        card_id: SourceCardId,
    },
}

/// The field a [`ChangeEvent`] reports as modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangedField {
    /// Card creation.
    Created,
    /// Card name.
    Name,
    /// Card list.
    Column,
    /// Card description.
    Description,
    /// Card due date.
    DueDate,
    /// Card archive flag.
    Closed,
    /// Card labels.
    Label,
}

impl ChangedField {
    /// Returns a stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Name => "name",
            Self::Column => "column",
            Self::Description => "description",
            Self::DueDate => "due_date",
            Self::Closed => "closed",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for ChangedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChangeEvent {
    /// Returns the identifier of the changed card.
    #[must_use]
    pub const fn card_id(&self) -> &SourceCardId {
        match self {
            Self::Created { card_id }
            | Self::NameChanged { card_id, .. }
            | Self::ColumnChanged { card_id, .. }
            | Self::DescriptionChanged { card_id, .. }
            | Self::DueDateChanged { card_id, .. }
            | Self::ClosedChanged { card_id, .. }
            | Self::LabelsChanged { card_id } => card_id,
        }
    }

    /// Returns the changed field.
    #[must_use]
    pub const fn field(&self) -> ChangedField {
        match self {
            Self::Created { .. } => ChangedField::Created,
            Self::NameChanged { .. } => ChangedField::Name,
            Self::ColumnChanged { .. } => ChangedField::Column,
            Self::DescriptionChanged { .. } => ChangedField::Description,
            Self::DueDateChanged { .. } => ChangedField::DueDate,
            Self::ClosedChanged { .. } => ChangedField::Closed,
            Self::LabelsChanged { .. } => ChangedField::Label,
        }
    }

    /// Decodes a webhook notification body.
    ///
    /// Accepts both the full webhook envelope (`{"action": {..}}`) and a
    /// bare action object. Returns `Ok(None)` for well-formed notifications
    /// about changes the sync engine does not mirror, such as card
    /// reordering or comments.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::MalformedEvent`] when the body is not JSON
    /// or lacks the `data`, `data.card` or `data.old` members a card action
    /// requires, or when `data.old` does not hold exactly one field.
    pub fn from_notification(body: &[u8]) -> Result<Option<Self>, SyncDomainError> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|err| SyncDomainError::MalformedEvent(err.to_string()))?;
        let action = match envelope {
            Envelope::Wrapped { action } => action,
            Envelope::Bare(action) => action,
        };
        action.into_event()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped { action: WireAction },
    Bare(WireAction),
}

#[derive(Debug, Deserialize)]
struct WireAction {
    #[serde(rename = "type")]
    kind: String,
    data: Option<WireData>,
}

#[derive(Debug, Deserialize)]
struct WireData {
    old: Option<Map<String, Value>>,
    card: Option<WireCard>,
    #[serde(rename = "listAfter")]
    list_after: Option<WireList>,
}

#[derive(Debug, Deserialize)]
struct WireCard {
    id: String,
    name: Option<String>,
    desc: Option<String>,
    #[serde(default)]
    due: Option<DateTime<Utc>>,
    closed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WireList {
    name: String,
}

fn malformed(reason: impl Into<String>) -> SyncDomainError {
    SyncDomainError::MalformedEvent(reason.into())
}

impl WireAction {
    fn into_event(self) -> Result<Option<ChangeEvent>, SyncDomainError> {
        let is_card_action = matches!(
            self.kind.as_str(),
            "createCard" | "updateCard" | "addLabelToCard" | "removeLabelFromCard"
        );
        if !is_card_action {
            return Ok(None);
        }

        let data = self.data.ok_or_else(|| malformed("missing data"))?;
        let card = data
            .card
            .as_ref()
            .ok_or_else(|| malformed("missing data.card"))?;
        let card_id =
            SourceCardId::new(card.id.as_str()).map_err(|err| malformed(err.to_string()))?;

        match self.kind.as_str() {
            "createCard" => Ok(Some(ChangeEvent::Created { card_id })),
            "addLabelToCard" | "removeLabelFromCard" => {
                Ok(Some(ChangeEvent::LabelsChanged { card_id }))
            }
            _ => data.into_update(card_id),
        }
    }
}

impl WireData {
    fn into_update(self, card_id: SourceCardId) -> Result<Option<ChangeEvent>, SyncDomainError> {
        let old = self.old.ok_or_else(|| malformed("missing data.old"))?;
        let mut keys = old.keys();
        let (Some(field), None) = (keys.next(), keys.next()) else {
            return Err(malformed(format!(
                "expected exactly one changed field in data.old, found {}",
                old.len()
            )));
        };
        let card = self.card.ok_or_else(|| malformed("missing data.card"))?;

        let event = match field.as_str() {
            "name" => ChangeEvent::NameChanged {
                card_id,
                name: card.name.ok_or_else(|| malformed("missing data.card.name"))?,
            },
            "idList" => ChangeEvent::ColumnChanged {
                card_id,
                column: self
                    .list_after
                    .map(|list| list.name)
                    .ok_or_else(|| malformed("missing data.listAfter.name"))?,
            },
            "desc" => ChangeEvent::DescriptionChanged {
                card_id,
                description: card.desc.ok_or_else(|| malformed("missing data.card.desc"))?,
            },
            "due" => ChangeEvent::DueDateChanged {
                card_id,
                due: card.due,
            },
            "closed" => ChangeEvent::ClosedChanged {
                card_id,
                closed: card
                    .closed
                    .ok_or_else(|| malformed("missing data.card.closed"))?,
            },
            "idLabels" => ChangeEvent::LabelsChanged { card_id },
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}
