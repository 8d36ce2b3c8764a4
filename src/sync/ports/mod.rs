//! Port contracts for board-to-tracker synchronization.
//!
//! Ports define infrastructure-agnostic interfaces used by sync services.

pub mod identity;
pub mod source;
pub mod target;
pub mod transport;

pub use identity::{IdentityStore, IdentityStoreError, IdentityStoreResult};
pub use source::SourceBoard;
pub use target::{DeleteOutcome, TargetTracker};
pub use transport::{TransportError, TransportResult};
