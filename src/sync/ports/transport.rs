//! Transport failures shared by the board and tracker ports.

use std::sync::Arc;
use thiserror::Error;

/// Result type for remote API calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Failure talking to the board or tracker API.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The remote API answered with a non-success status.
    #[error("{system} answered HTTP {status}: {body}")]
    Status {
        /// Remote system name.
        system: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request could not be sent or its response not read.
    #[error("request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Wraps a request-level error.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
