//! Pattern domain model.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `created_at` is assigned by storage at insertion and never changes.
//! - `name` is non-empty; `shafts` and `treadles` are positive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-generated surrogate key of a pattern.
pub type PatternId = i64;

/// A named weaving design as persisted in the `patterns` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: PatternId,
    /// Display label. Not required to be unique.
    pub name: String,
    /// Number of loom shafts used by this draft.
    pub shafts: i64,
    /// Number of loom treadles used by this draft.
    pub treadles: i64,
    /// Insertion time, second precision (SQLite `CURRENT_TIMESTAMP`).
    pub created_at: DateTime<Utc>,
}

/// Writable pattern fields, used for both insert and full overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPattern {
    pub name: String,
    pub shafts: i64,
    pub treadles: i64,
}

impl NewPattern {
    pub fn new(name: impl Into<String>, shafts: i64, treadles: i64) -> Self {
        Self {
            name: name.into(),
            shafts,
            treadles,
        }
    }

    /// Checks the field rules shared by create and update paths.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank after trimming.
    /// - `NonPositiveCount` when `shafts` or `treadles` is below 1.
    pub fn validate(&self) -> Result<(), PatternValidationError> {
        if self.name.trim().is_empty() {
            return Err(PatternValidationError::EmptyName);
        }
        ensure_positive("shafts", self.shafts)?;
        ensure_positive("treadles", self.treadles)?;
        Ok(())
    }
}

/// Rejection reasons for pattern and structural row input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternValidationError {
    EmptyName,
    NonPositiveCount { field: &'static str, value: i64 },
    NonPositiveIndex { field: &'static str, value: i64 },
}

impl Display for PatternValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pattern name cannot be empty"),
            Self::NonPositiveCount { field, value } => {
                write!(f, "pattern {field} must be at least 1, got {value}")
            }
            Self::NonPositiveIndex { field, value } => {
                write!(f, "{field} must be at least 1, got {value}")
            }
        }
    }
}

impl Error for PatternValidationError {}

fn ensure_positive(field: &'static str, value: i64) -> Result<(), PatternValidationError> {
    if value < 1 {
        return Err(PatternValidationError::NonPositiveCount { field, value });
    }
    Ok(())
}
