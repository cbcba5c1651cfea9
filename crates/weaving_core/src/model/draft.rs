//! Structural rows of a draft: threading, treadling and tie-up.
//!
//! Index ranges against the owning pattern's `shafts`/`treadles` are a
//! caller concern; only positivity is checked here. Duplicate positions
//! are legal.

use crate::model::pattern::{Pattern, PatternId, PatternValidationError};
use serde::{Deserialize, Serialize};

/// Assigns a shaft to a warp thread position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadingEntry {
    pub id: i64,
    pub pattern_id: PatternId,
    pub thread_number: i64,
    pub shaft: i64,
}

/// Assigns a shaft to a pick in the treadling sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreadlingEntry {
    pub id: i64,
    pub pattern_id: PatternId,
    pub treadle_number: i64,
    pub shaft: i64,
}

/// Links a treadle to one shaft it lifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieUpEntry {
    pub id: i64,
    pub pattern_id: PatternId,
    pub treadle: i64,
    pub shaft: i64,
}

/// Complete draft read model: a pattern plus all of its structural rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub pattern: Pattern,
    pub threading: Vec<ThreadingEntry>,
    pub treadling: Vec<TreadlingEntry>,
    pub tieup: Vec<TieUpEntry>,
}

/// Rejects zero or negative positions and shaft/treadle indices.
pub fn validate_index(field: &'static str, value: i64) -> Result<(), PatternValidationError> {
    if value < 1 {
        return Err(PatternValidationError::NonPositiveIndex { field, value });
    }
    Ok(())
}
