//! Persistence layer for weaving drafts.
//!
//! Patterns and their threading, treadling and tie-up rows live in one
//! embedded SQLite file. `PatternStore` is the public operation surface;
//! `db`, `repo` and `model` are exposed for callers that manage their own
//! connection.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, flush_logs, init_logging, logging_status};
pub use model::draft::{Draft, ThreadingEntry, TieUpEntry, TreadlingEntry};
pub use model::pattern::{NewPattern, Pattern, PatternId, PatternValidationError};
pub use repo::pattern_repo::{PatternRepository, RepoError, RepoResult, SqlitePatternRepository};
pub use store::{PatternStore, StoreConfig, StoreError, StoreResult, DEFAULT_DB_FILE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
