//! Error types for sync domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or translating sync domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncDomainError {
    /// An identifier was empty after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// The board column has no configured tracker state.
    #[error("column '{0}' has no tracker state mapping")]
    UnmappableColumn(String),

    /// A change notification did not have the expected shape.
    #[error("malformed change event: {0}")]
    MalformedEvent(String),

    /// An estimate value lies outside the supported point scale.
    #[error("invalid estimate {0}, expected 0 to 3")]
    InvalidEstimate(u8),
}

/// Error returned while parsing tracker story states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown story state: {0}")]
pub struct ParseItemStateError(pub String);
