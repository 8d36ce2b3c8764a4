//! Board-to-tracker synchronization.
//!
//! Mirrors kanban board cards onto tracker stories, one direction only.
//! Change notifications from the board are classified into typed events,
//! translated into story mutations and applied to the tracker. A bulk
//! importer reconciles a whole board snapshot, and an identity store
//! guarantees each card is materialized as a story at most once. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
