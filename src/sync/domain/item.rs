//! Tracker story states, estimates and mutation payloads.

use super::{ParseItemStateError, SyncDomainError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Workflow state of a tracker story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Story sits in the icebox.
    Unscheduled,
    /// Story is scheduled but not started.
    Unstarted,
    /// Story is planned for an iteration.
    Planned,
    /// Work on the story has started.
    Started,
    /// Work is finished and awaiting delivery.
    Finished,
    /// Story has been delivered for acceptance.
    Delivered,
    /// Story has been accepted.
    Accepted,
    /// Story was rejected on acceptance.
    Rejected,
}

impl ItemState {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unscheduled => "unscheduled",
            Self::Unstarted => "unstarted",
            Self::Planned => "planned",
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Delivered => "delivered",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` for states whose moves also refresh the estimate.
    #[must_use]
    pub const fn carries_estimate(self) -> bool {
        matches!(self, Self::Started | Self::Finished | Self::Delivered)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ItemState {
    type Error = ParseItemStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unscheduled" => Ok(Self::Unscheduled),
            "unstarted" => Ok(Self::Unstarted),
            "planned" => Ok(Self::Planned),
            "started" => Ok(Self::Started),
            "finished" => Ok(Self::Finished),
            "delivered" => Ok(Self::Delivered),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseItemStateError(value.to_owned())),
        }
    }
}

/// Story point estimate on the 0 to 3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Estimate(u8);

impl Estimate {
    /// Zero points.
    pub const ZERO: Self = Self(0);
    /// One point.
    pub const ONE: Self = Self(1);
    /// Two points.
    pub const TWO: Self = Self(2);
    /// Three points, the ceiling of the scale.
    pub const THREE: Self = Self(3);

    /// Creates a validated estimate.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::InvalidEstimate`] for values above 3.
    pub const fn new(points: u8) -> Result<Self, SyncDomainError> {
        if points > Self::THREE.0 {
            return Err(SyncDomainError::InvalidEstimate(points));
        }
        Ok(Self(points))
    }

    /// Returns the number of points.
    #[must_use]
    pub const fn points(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Estimate {
    type Error = SyncDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Estimate> for u8 {
    fn from(value: Estimate) -> Self {
        value.0
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partial set of story fields sent to the tracker on create or update.
///
/// Only fields that are set are serialized, so an update payload touches
/// exactly the fields a change event reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_state: Option<ItemState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimate: Option<Estimate>,
}

impl ItemPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the story name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the story description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the full label list; labels are sent in sorted order.
    #[must_use]
    pub fn with_labels(mut self, labels: &BTreeSet<String>) -> Self {
        self.labels = Some(labels.iter().cloned().collect());
        self
    }

    /// Sets the workflow state.
    #[must_use]
    pub const fn with_state(mut self, state: ItemState) -> Self {
        self.current_state = Some(state);
        self
    }

    /// Sets the estimate.
    #[must_use]
    pub const fn with_estimate(mut self, estimate: Estimate) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Returns the story name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the story description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the label list, if set.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Returns the workflow state, if set.
    #[must_use]
    pub const fn state(&self) -> Option<ItemState> {
        self.current_state
    }

    /// Returns the estimate, if set.
    #[must_use]
    pub const fn estimate(&self) -> Option<Estimate> {
        self.estimate
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.labels.is_none()
            && self.current_state.is_none()
            && self.estimate.is_none()
    }
}
