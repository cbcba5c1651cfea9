//! Repository layer for pattern persistence.
//!
//! # Responsibility
//! - Define the data access contract over the fixed four-table schema.
//! - Keep SQL details out of the store facade.
//!
//! # Invariants
//! - Writes validate input before any SQL mutation.
//! - Update/delete of a missing id is a zero-row no-op, not an error.

pub mod pattern_repo;
