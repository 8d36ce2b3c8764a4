//! `PostgreSQL` adapters for link persistence.

mod identity;
mod models;
mod schema;

pub use identity::{IdentityPgPool, PostgresIdentityStore};
