//! In-memory source board for sync tests.

use crate::sync::{
    domain::{BoardCard, ListId, SourceCardId},
    ports::{SourceBoard, TransportError, TransportResult},
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// In-memory board holding cards and list names.
///
/// Cards are listed in identifier order. Individual cards can be marked as
/// unreachable to exercise transport failure handling.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceBoard {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Debug, Default)]
struct BoardState {
    cards: BTreeMap<SourceCardId, BoardCard>,
    lists: HashMap<ListId, String>,
    unreachable_cards: HashSet<SourceCardId>,
}

fn lock_error(err: impl ToString) -> TransportError {
    TransportError::request(std::io::Error::other(err.to_string()))
}

fn not_found(what: String) -> TransportError {
    TransportError::Status {
        system: "board",
        status: 404,
        body: what,
    }
}

impl InMemorySourceBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or renames a list.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn put_list(&self, list_id: ListId, name: impl Into<String>) -> TransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.lists.insert(list_id, name.into());
        Ok(())
    }

    /// Adds or replaces a card.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn put_card(&self, card: BoardCard) -> TransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.cards.insert(card.id().clone(), card);
        Ok(())
    }

    /// Makes single-card fetches for `card_id` fail.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn make_unreachable(&self, card_id: SourceCardId) -> TransportResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unreachable_cards.insert(card_id);
        Ok(())
    }
}

#[async_trait]
impl SourceBoard for InMemorySourceBoard {
    async fn board_cards(&self) -> TransportResult<Vec<BoardCard>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.cards.values().cloned().collect())
    }

    async fn card(&self, card_id: &SourceCardId) -> TransportResult<BoardCard> {
        let state = self.state.read().map_err(lock_error)?;
        if state.unreachable_cards.contains(card_id) {
            return Err(TransportError::Status {
                system: "board",
                status: 503,
                body: format!("card {card_id} unavailable"),
            });
        }
        state
            .cards
            .get(card_id)
            .cloned()
            .ok_or_else(|| not_found(format!("card {card_id}")))
    }

    async fn list_name(&self, list_id: &ListId) -> TransportResult<String> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| not_found(format!("list {list_id}")))
    }
}
