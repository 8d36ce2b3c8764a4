//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit testing without database or network dependencies.

mod board;
mod identity;
mod tracker;

pub use board::InMemorySourceBoard;
pub use identity::InMemoryIdentityStore;
pub use tracker::{RecordingTargetTracker, TrackerCall};
