//! Adapter implementations for sync ports.
//!
//! - [`memory`]: thread-safe in-memory adapters for tests and dry runs
//! - [`postgres`]: `PostgreSQL` identity store
//! - [`http`]: board and tracker REST clients

pub mod http;
pub mod memory;
pub mod postgres;
