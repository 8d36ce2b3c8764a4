//! REST clients for the board and tracker APIs.

mod pivotal;
mod trello;

pub use pivotal::PivotalTracker;
pub use trello::TrelloBoard;

use crate::sync::ports::{TransportError, TransportResult};
use std::time::Duration;

/// Builds the shared HTTP client with a per-request timeout.
///
/// # Errors
///
/// Returns [`TransportError::Request`] when the TLS backend cannot be
/// initialized.
pub fn build_client(timeout: Duration) -> TransportResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(TransportError::request)
}

/// Passes successful responses through and turns the rest into
/// [`TransportError::Status`], keeping the body for diagnostics.
async fn check_status(
    system: &'static str,
    response: reqwest::Response,
) -> TransportResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        system,
        status: status.as_u16(),
        body,
    })
}

fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_owned()
}
