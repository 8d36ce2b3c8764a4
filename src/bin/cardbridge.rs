//! Mirrors a kanban board onto a tracker project.
//!
//! Usage:
//!
//! ```text
//! cardbridge --config cardbridge.toml serve
//! cardbridge --config cardbridge.toml import
//! ```
//!
//! `serve` listens for board webhooks and applies each change to the linked
//! tracker story. `import` creates stories for every card that has none yet
//! and exits. Log verbosity follows `RUST_LOG` (default `info`).

use cardbridge::{
    config::SyncConfig,
    sync::{
        adapters::{
            http::{PivotalTracker, TrelloBoard, build_client},
            postgres::{IdentityPgPool, PostgresIdentityStore},
        },
        services::{BoardImporter, EventDispatcher, FieldTranslator},
    },
    webhook,
};
use clap::{Parser, Subcommand};
use diesel::{
    pg::PgConnection,
    r2d2::{ConnectionManager, Pool},
};
use mockable::DefaultClock;
use std::{path::PathBuf, sync::Arc};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "cardbridge", version, about = "Mirror board cards onto tracker stories")]
struct Cli {
    /// Settings file.
    #[arg(long, default_value = "cardbridge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept board webhooks and apply changes as they arrive.
    Serve,
    /// Create stories for every card on the board that has none yet.
    Import,
}

/// Adapters shared by both subcommands.
struct Wiring {
    source: Arc<TrelloBoard>,
    target: Arc<PivotalTracker>,
    identity: Arc<PostgresIdentityStore<DefaultClock>>,
    clock: Arc<DefaultClock>,
    translator: FieldTranslator,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = SyncConfig::load(&cli.config)?;
    let wiring = wire(&config).await?;

    match cli.command {
        Command::Serve => serve(&config, wiring).await,
        Command::Import => import(wiring).await,
    }
}

async fn wire(config: &SyncConfig) -> Result<Wiring, BoxError> {
    let translator = config.translator()?;
    let client = build_client(config.http.request_timeout())?;
    let source = Arc::new(TrelloBoard::new(
        client.clone(),
        config.source.base_url.as_str(),
        config.source.board_id.as_str(),
        config.source.api_key.as_str(),
        config.source.token.as_str(),
    ));
    let target = Arc::new(PivotalTracker::new(
        client,
        config.target.base_url.as_str(),
        config.target.project_id.as_str(),
        config.target.token.as_str(),
    ));

    let clock = Arc::new(DefaultClock);
    let pool: IdentityPgPool = Pool::builder()
        .max_size(config.store.pool_size)
        .build(ConnectionManager::<PgConnection>::new(
            config.store.database_url.as_str(),
        ))?;
    let identity = Arc::new(PostgresIdentityStore::new(pool, Arc::clone(&clock)));
    identity.ensure_schema().await?;

    Ok(Wiring {
        source,
        target,
        identity,
        clock,
        translator,
    })
}

async fn serve(config: &SyncConfig, wiring: Wiring) -> Result<(), BoxError> {
    let (sender, receiver) = webhook::notification_channel(config.http.queue_capacity);
    let dispatcher = EventDispatcher::new(
        wiring.source,
        wiring.target,
        wiring.identity,
        wiring.clock,
        wiring.translator,
    );
    let worker = tokio::spawn(async move { dispatcher.run(receiver).await });

    let listener = tokio::net::TcpListener::bind(config.http.bind_address.as_str()).await?;
    info!(address = %listener.local_addr()?, "listening for board webhooks");
    axum::serve(listener, webhook::router(sender))
        .with_graceful_shutdown(webhook::shutdown_on(signal::ctrl_c()))
        .await?;

    // The router held the only sender; the worker drains what is queued
    // and stops.
    worker.await?;
    Ok(())
}

async fn import(wiring: Wiring) -> Result<(), BoxError> {
    let importer = BoardImporter::new(
        wiring.source,
        wiring.target,
        wiring.identity,
        wiring.clock,
        wiring.translator,
    );
    let summary = importer.import_from_board().await?;
    for (card_id, target_id) in summary.created() {
        info!(%card_id, %target_id, "imported card");
    }
    for (card_id, reason) in summary.failed() {
        warn!(%card_id, %reason, "card not imported");
    }
    info!(
        considered = summary.total(),
        created = summary.created().len(),
        "import complete"
    );
    Ok(())
}
