//! `PostgreSQL` identity store implementation.

use super::{
    models::{LinkRow, NewReservationRow},
    schema::card_links,
};
use crate::sync::{
    domain::{LinkRecord, Reservation, SourceCardId, TargetItemId},
    ports::{IdentityStore, IdentityStoreError, IdentityStoreResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{Text, Timestamptz};
use mockable::Clock;
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by the identity store.
pub type IdentityPgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating the `card_links` table.
const CREATE_CARD_LINKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_card_links/up.sql");

/// Links a card unless it already has a story. Affects zero rows when the
/// card is already linked.
const RECORD_LINK_SQL: &str = concat!(
    "INSERT INTO card_links ",
    "(link_key, source_id, card_name, target_id, reserved_at, linked_at) ",
    "VALUES ($1, $2, $3, $4, $5, $5) ",
    "ON CONFLICT (link_key) DO UPDATE ",
    "SET target_id = EXCLUDED.target_id, linked_at = EXCLUDED.linked_at ",
    "WHERE card_links.target_id IS NULL",
);

/// `PostgreSQL`-backed identity store.
///
/// Reservation relies on the primary key over `link_key`, so concurrent
/// workers sharing the database never both acquire the same card.
#[derive(Debug, Clone)]
pub struct PostgresIdentityStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    pool: IdentityPgPool,
    clock: Arc<C>,
}

impl<C> PostgresIdentityStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IdentityPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    /// Creates the `card_links` table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::Persistence`] when the statement fails.
    pub async fn ensure_schema(&self) -> IdentityStoreResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_CARD_LINKS_SQL)
                .map_err(IdentityStoreError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> IdentityStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IdentityStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IdentityStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IdentityStoreError::persistence)?
    }
}

#[async_trait]
impl<C> IdentityStore for PostgresIdentityStore<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn exists(&self, source_id: &SourceCardId) -> IdentityStoreResult<bool> {
        let key = source_id.link_key();
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                card_links::table.filter(card_links::link_key.eq(key)),
            ))
            .get_result::<bool>(connection)
            .map_err(IdentityStoreError::persistence)
        })
        .await
    }

    async fn reserve(
        &self,
        source_id: &SourceCardId,
        card_name: &str,
    ) -> IdentityStoreResult<Reservation> {
        let row = NewReservationRow {
            link_key: source_id.link_key(),
            source_id: source_id.as_str().to_owned(),
            card_name: card_name.to_owned(),
            reserved_at: self.clock.utc(),
        };
        self.run_blocking(move |connection| {
            let inserted = diesel::insert_into(card_links::table)
                .values(&row)
                .on_conflict(card_links::link_key)
                .do_nothing()
                .execute(connection)
                .map_err(IdentityStoreError::persistence)?;
            Ok(if inserted == 1 {
                Reservation::Acquired
            } else {
                Reservation::Held
            })
        })
        .await
    }

    async fn record(&self, link: &LinkRecord) -> IdentityStoreResult<()> {
        let source_id = link.source_id().clone();
        let target_id = link.target_id().as_str().to_owned();
        let card_name = link.card_name().to_owned();
        let created_at = link.created_at();
        self.run_blocking(move |connection| {
            let affected = diesel::sql_query(RECORD_LINK_SQL)
                .bind::<Text, _>(source_id.link_key())
                .bind::<Text, _>(source_id.as_str())
                .bind::<Text, _>(card_name)
                .bind::<Text, _>(target_id)
                .bind::<Timestamptz, _>(created_at)
                .execute(connection)
                .map_err(IdentityStoreError::persistence)?;
            if affected == 0 {
                return Err(IdentityStoreError::AlreadyLinked(source_id));
            }
            Ok(())
        })
        .await
    }

    async fn find(&self, source_id: &SourceCardId) -> IdentityStoreResult<Option<LinkRecord>> {
        let key = source_id.link_key();
        self.run_blocking(move |connection| {
            let row = card_links::table
                .filter(card_links::link_key.eq(key))
                .filter(card_links::target_id.is_not_null())
                .select(LinkRow::as_select())
                .first::<LinkRow>(connection)
                .optional()
                .map_err(IdentityStoreError::persistence)?;
            row.map(row_to_link).transpose()
        })
        .await
    }

    async fn release(&self, source_id: &SourceCardId) -> IdentityStoreResult<()> {
        let key = source_id.link_key();
        self.run_blocking(move |connection| {
            diesel::delete(
                card_links::table
                    .filter(card_links::link_key.eq(key))
                    .filter(card_links::target_id.is_null()),
            )
            .execute(connection)
            .map_err(IdentityStoreError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn row_to_link(row: LinkRow) -> IdentityStoreResult<LinkRecord> {
    let LinkRow {
        link_key,
        source_id,
        card_name,
        target_id,
        reserved_at,
        linked_at,
    } = row;

    let persisted_target = target_id.ok_or_else(|| {
        IdentityStoreError::persistence(std::io::Error::other(format!(
            "link {link_key} has no target id"
        )))
    })?;
    let source = SourceCardId::new(source_id).map_err(IdentityStoreError::persistence)?;
    let target = TargetItemId::new(persisted_target).map_err(IdentityStoreError::persistence)?;
    Ok(LinkRecord::from_persisted(
        source,
        target,
        card_name,
        linked_at.unwrap_or(reserved_at),
    ))
}
