//! Service-level errors shared by the dispatcher and the importer.

use crate::sync::{
    domain::SyncDomainError,
    ports::{IdentityStoreError, TransportError},
};
use thiserror::Error;

/// Errors raised while processing a change event or importing a card.
#[derive(Debug, Clone, Error)]
pub enum SyncServiceError {
    /// Domain translation failed.
    #[error(transparent)]
    Domain(#[from] SyncDomainError),
    /// Identity store operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityStoreError),
    /// A board or tracker API call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for sync service operations.
pub type SyncServiceResult<T> = Result<T, SyncServiceError>;
