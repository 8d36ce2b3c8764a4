//! In-memory identity store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::sync::{
    domain::{LinkRecord, Reservation, SourceCardId},
    ports::{IdentityStore, IdentityStoreError, IdentityStoreResult},
};

/// Thread-safe in-memory identity store.
///
/// Entries are keyed exactly like the persistent store
/// (`"{source_id}_created"`), and reservation is atomic under the write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    state: Arc<RwLock<HashMap<String, Entry>>>,
}

#[derive(Debug, Clone)]
struct Entry {
    card_name: String,
    link: Option<LinkRecord>,
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded link.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn links(&self) -> IdentityStoreResult<Vec<LinkRecord>> {
        let state = self.state.read().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .values()
            .filter_map(|entry| entry.link.clone())
            .collect())
    }

    /// Returns the marker value stored for a card, if any.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn marker(&self, source_id: &SourceCardId) -> IdentityStoreResult<Option<String>> {
        let state = self.state.read().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .get(&source_id.link_key())
            .map(|entry| entry.card_name.clone()))
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn exists(&self, source_id: &SourceCardId) -> IdentityStoreResult<bool> {
        let state = self.state.read().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.contains_key(&source_id.link_key()))
    }

    async fn reserve(
        &self,
        source_id: &SourceCardId,
        card_name: &str,
    ) -> IdentityStoreResult<Reservation> {
        let mut state = self.state.write().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let key = source_id.link_key();
        if state.contains_key(&key) {
            return Ok(Reservation::Held);
        }
        state.insert(
            key,
            Entry {
                card_name: card_name.to_owned(),
                link: None,
            },
        );
        Ok(Reservation::Acquired)
    }

    async fn record(&self, link: &LinkRecord) -> IdentityStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let entry = state
            .entry(link.source_id().link_key())
            .or_insert_with(|| Entry {
                card_name: link.card_name().to_owned(),
                link: None,
            });
        if entry.link.is_some() {
            return Err(IdentityStoreError::AlreadyLinked(link.source_id().clone()));
        }
        entry.link = Some(link.clone());
        Ok(())
    }

    async fn find(&self, source_id: &SourceCardId) -> IdentityStoreResult<Option<LinkRecord>> {
        let state = self.state.read().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .get(&source_id.link_key())
            .and_then(|entry| entry.link.clone()))
    }

    async fn release(&self, source_id: &SourceCardId) -> IdentityStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let key = source_id.link_key();
        if state.get(&key).is_some_and(|entry| entry.link.is_none()) {
            state.remove(&key);
        }
        Ok(())
    }
}
