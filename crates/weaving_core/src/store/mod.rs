//! Pattern store facade: the public operation surface.
//!
//! # Responsibility
//! - Resolve the configured storage location.
//! - Run every operation on its own short-lived connection.
//!
//! # Invariants
//! - No connection outlives a call; it is dropped on every exit path.
//! - One operation is one auto-committed statement; nothing spans calls.

mod config;
mod error;
mod pattern_store;

pub use config::{StoreConfig, DEFAULT_DB_FILE};
pub use error::{StoreError, StoreResult};
pub use pattern_store::PatternStore;
