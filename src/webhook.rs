//! Webhook intake for board notifications.
//!
//! The handler only enqueues the raw body; a single [`EventDispatcher`]
//! task drains the queue so events are applied in arrival order.
//!
//! [`EventDispatcher`]: crate::sync::services::EventDispatcher

use crate::sync::services::Notification;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Creates the bounded queue between the webhook and the dispatcher.
#[must_use]
pub fn notification_channel(
    capacity: usize,
) -> (mpsc::Sender<Notification>, mpsc::Receiver<Notification>) {
    mpsc::channel(capacity.max(1))
}

/// Builds the webhook router.
///
/// `HEAD /webhook` answers the board's callback verification request,
/// `POST /webhook` enqueues a notification, and `GET /health` reports
/// liveness.
#[must_use]
pub fn router(queue: mpsc::Sender<Notification>) -> Router {
    Router::new()
        .route("/webhook", post(receive).head(verify_callback))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(queue)
}

/// Resolves once `signal` fires.
///
/// If the signal listener cannot be installed the error is logged and the
/// returned future never resolves, so the server keeps running.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            error!(error = %err, "cannot listen for shutdown signal; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

async fn verify_callback() -> StatusCode {
    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}

async fn receive(State(queue): State<mpsc::Sender<Notification>>, body: Bytes) -> StatusCode {
    let notification = Notification::new(body.to_vec());
    let delivery_id = notification.delivery_id();
    match queue.send(notification).await {
        Ok(()) => {
            debug!(%delivery_id, "notification queued");
            StatusCode::ACCEPTED
        }
        Err(_) => {
            error!(%delivery_id, "dispatcher is gone; rejecting notification");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
