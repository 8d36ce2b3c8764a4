//! Cardbridge: one-way synchronization from a kanban board to a tracker.
//!
//! Board cards are mirrored as tracker stories. Live changes arrive as
//! webhook notifications and are applied one at a time; a bulk import
//! creates stories for every card not yet mirrored. Each card becomes at
//! most one story, even when notifications are redelivered.
//!
//! # Architecture
//!
//! The `sync` context follows hexagonal architecture principles:
//!
//! - **Domain**: Cards, payloads, events and the estimate heuristic
//! - **Ports**: Board, tracker and identity store contracts
//! - **Adapters**: REST clients, `PostgreSQL` and in-memory implementations
//! - **Services**: Event dispatcher and bulk importer
//!
//! # Modules
//!
//! - [`sync`]: Board-to-tracker synchronization
//! - [`config`]: TOML settings
//! - [`webhook`]: HTTP intake for board notifications

pub mod config;
pub mod sync;
pub mod webhook;
