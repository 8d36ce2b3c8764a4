//! Shared helpers for `PostgreSQL` integration tests.

use cardbridge::sync::{
    adapters::postgres::{IdentityPgPool, PostgresIdentityStore},
    domain::SourceCardId,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Identity store under test.
pub type TestStore = PostgresIdentityStore<FixedClock>;

/// SQL creating the `card_links` table.
const CREATE_CARD_LINKS_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_card_links/up.sql");

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "cardbridge_test_template";

/// Clock frozen at a whole second so stored timestamps compare exactly.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2026-05-04 08:30 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

pub fn card_id(raw: &str) -> SourceCardId {
    SourceCardId::new(raw).expect("valid card id")
}

/// Creates a tokio runtime for driving the async store in tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_CARD_LINKS_SQL)
                .map_err(|e| eyre::eyre!("SQL error: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates a database from the template and returns a store over it.
pub fn setup_store(cluster: &TestCluster, db_name: &str) -> Result<TestStore, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    // Several connections so racing reservations really run in parallel.
    let pool: IdentityPgPool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(url))
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(PostgresIdentityStore::new(pool, Arc::new(FixedClock(now()))))
}

/// Counts rows in `card_links`, linked or not.
pub fn count_rows(cluster: &TestCluster, db_name: &str) -> Result<i64, BoxError> {
    #[derive(diesel::QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        count: i64,
    }

    let url = cluster.connection().database_url(db_name);
    let mut conn = PgConnection::establish(&url).map_err(|e| Box::new(e) as BoxError)?;
    let row = diesel::sql_query("SELECT COUNT(*) AS count FROM card_links")
        .get_result::<CountRow>(&mut conn)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(row.count)
}

/// Drops the test database even when the test panics.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}
