//! Weaving draft domain model.
//!
//! # Responsibility
//! - Define the pattern record and its three structural row types.
//! - Own input validation rules applied before persistence.
//!
//! # Invariants
//! - Every structural row belongs to exactly one pattern via `pattern_id`.
//! - Structural rows are append-only; they live and die with their pattern.

pub mod draft;
pub mod pattern;
