//! Recording tracker adapter for sync tests.

use crate::sync::{
    domain::{ItemPayload, TargetItemId},
    ports::{DeleteOutcome, TargetTracker, TransportError, TransportResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// A call received by [`RecordingTargetTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    /// Story creation with its payload.
    Create(ItemPayload),
    /// Story update with its payload.
    Update(TargetItemId, ItemPayload),
    /// Story deletion.
    Delete(TargetItemId),
}

/// In-memory tracker that records every call it receives.
///
/// Created stories receive sequential identifiers starting at `1000`.
#[derive(Debug, Clone, Default)]
pub struct RecordingTargetTracker {
    state: Arc<RwLock<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    calls: Vec<TrackerCall>,
    stories: HashMap<TargetItemId, ItemPayload>,
    next_id: u64,
    rejected_names: HashSet<String>,
}

const FIRST_STORY_ID: u64 = 1000;

fn lock_error(err: impl ToString) -> TransportError {
    TransportError::request(std::io::Error::other(err.to_string()))
}

impl RecordingTargetTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes creation of stories named `name` fail with HTTP 422.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn reject_name(&self, name: impl Into<String>) -> TransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.rejected_names.insert(name.into());
        Ok(())
    }

    /// Returns every call received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn calls(&self) -> TransportResult<Vec<TrackerCall>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls.clone())
    }

    /// Returns the current fields of a story, merged from all updates.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn story(&self, id: &TargetItemId) -> TransportResult<Option<ItemPayload>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.stories.get(id).cloned())
    }
}

fn merge(current: &ItemPayload, update: &ItemPayload) -> ItemPayload {
    let mut merged = current.clone();
    if let Some(name) = update.name() {
        merged = merged.with_name(name);
    }
    if let Some(description) = update.description() {
        merged = merged.with_description(description);
    }
    if let Some(labels) = update.labels() {
        merged = merged.with_labels(&labels.iter().cloned().collect());
    }
    if let Some(state) = update.state() {
        merged = merged.with_state(state);
    }
    if let Some(estimate) = update.estimate() {
        merged = merged.with_estimate(estimate);
    }
    merged
}

#[async_trait]
impl TargetTracker for RecordingTargetTracker {
    async fn create_item(&self, payload: &ItemPayload) -> TransportResult<TargetItemId> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(TrackerCall::Create(payload.clone()));
        if payload
            .name()
            .is_some_and(|name| state.rejected_names.contains(name))
        {
            return Err(TransportError::Status {
                system: "tracker",
                status: 422,
                body: "story rejected".to_owned(),
            });
        }

        let sequence = FIRST_STORY_ID + state.next_id;
        state.next_id += 1;
        let id = TargetItemId::new(sequence.to_string())
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        state.stories.insert(id.clone(), payload.clone());
        Ok(id)
    }

    async fn update_item(&self, id: &TargetItemId, payload: &ItemPayload) -> TransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .calls
            .push(TrackerCall::Update(id.clone(), payload.clone()));
        let current = state.stories.get(id).cloned().ok_or_else(|| TransportError::Status {
            system: "tracker",
            status: 404,
            body: format!("story {id} not found"),
        })?;
        state.stories.insert(id.clone(), merge(&current, payload));
        Ok(())
    }

    async fn delete_item(&self, id: &TargetItemId) -> TransportResult<DeleteOutcome> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(TrackerCall::Delete(id.clone()));
        Ok(if state.stories.remove(id).is_some() {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::AlreadyGone
        })
    }
}
