//! Read-only port onto the source board.

use super::TransportResult;
use crate::sync::domain::{BoardCard, ListId, SourceCardId};
use async_trait::async_trait;

/// Board API contract.
#[async_trait]
pub trait SourceBoard: Send + Sync {
    /// Lists every open card on the board.
    async fn board_cards(&self) -> TransportResult<Vec<BoardCard>>;

    /// Fetches a single card, including its current due date and labels.
    async fn card(&self, card_id: &SourceCardId) -> TransportResult<BoardCard>;

    /// Resolves a list identifier to the list name.
    async fn list_name(&self, list_id: &ListId) -> TransportResult<String>;
}
