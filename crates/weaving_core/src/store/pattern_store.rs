//! `PatternStore`: per-call connection facade over the pattern repository.
//!
//! # Invariants
//! - Each public operation opens the database, runs one statement (reads
//!   may run a few SELECTs), auto-commits and drops the connection.
//! - Update/delete on an unknown id succeed silently; the no-op is logged.
//! - Engine errors propagate unmodified; there is no retry policy.

use super::config::StoreConfig;
use super::error::StoreResult;
use crate::db::open_db;
use crate::model::draft::{Draft, ThreadingEntry, TieUpEntry, TreadlingEntry};
use crate::model::pattern::{NewPattern, Pattern, PatternId};
use crate::repo::pattern_repo::{PatternRepository, SqlitePatternRepository};
use log::{info, warn};
use std::path::PathBuf;

/// Entry point for all pattern persistence operations.
///
/// Holds only the storage location; no connection or cached rows are kept
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    config: StoreConfig,
}

impl PatternStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Shorthand for `PatternStore::new(StoreConfig::new(path))`.
    pub fn open(db_path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::new(db_path))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates the database file and schema if absent.
    ///
    /// Safe to call any number of times; existing rows are left untouched.
    pub fn initialize(&self) -> StoreResult<()> {
        self.with_repo(|_| Ok(()))?;
        info!(
            "event=store_init module=store status=ok db_path={}",
            self.config.db_path().display()
        );
        Ok(())
    }

    /// Returns every pattern in insertion (id) order.
    pub fn list_patterns(&self) -> StoreResult<Vec<Pattern>> {
        self.with_repo(|repo| Ok(repo.list_patterns()?))
    }

    /// Returns one pattern, or `None` when `id` is unknown.
    pub fn get_pattern(&self, id: PatternId) -> StoreResult<Option<Pattern>> {
        self.with_repo(|repo| Ok(repo.get_pattern(id)?))
    }

    /// Inserts a new pattern and returns its generated id.
    ///
    /// # Errors
    /// - `Validation` for a blank name or non-positive counts.
    pub fn add_pattern(&self, name: &str, shafts: i64, treadles: i64) -> StoreResult<PatternId> {
        let pattern = NewPattern::new(name, shafts, treadles);
        let id = self.with_repo(|repo| Ok(repo.create_pattern(&pattern)?))?;
        info!(
            "event=pattern_add module=store status=ok pattern_id={id} name={name:?} shafts={shafts} treadles={treadles}"
        );
        Ok(id)
    }

    /// Overwrites name and counts of pattern `id`.
    ///
    /// Structural rows are not revisited even when counts shrink below
    /// indices they reference. Unknown `id` is a silent no-op.
    pub fn update_pattern(
        &self,
        id: PatternId,
        name: &str,
        shafts: i64,
        treadles: i64,
    ) -> StoreResult<()> {
        let pattern = NewPattern::new(name, shafts, treadles);
        let matched = self.with_repo(|repo| Ok(repo.update_pattern(id, &pattern)?))?;
        if matched {
            info!(
                "event=pattern_update module=store status=ok pattern_id={id} name={name:?} shafts={shafts} treadles={treadles}"
            );
        } else {
            warn!("event=pattern_update module=store status=noop pattern_id={id} reason=not_found");
        }
        Ok(())
    }

    /// Deletes pattern `id`; its threading, treadling and tie-up rows go
    /// with it by cascade. Unknown `id` is a silent no-op.
    pub fn delete_pattern(&self, id: PatternId) -> StoreResult<()> {
        let matched = self.with_repo(|repo| Ok(repo.delete_pattern(id)?))?;
        if matched {
            info!("event=pattern_delete module=store status=ok pattern_id={id}");
        } else {
            warn!("event=pattern_delete module=store status=noop pattern_id={id} reason=not_found");
        }
        Ok(())
    }

    /// Appends a threading row and returns its id.
    ///
    /// # Errors
    /// - `ConstraintViolation` when `pattern_id` does not exist.
    /// - `Validation` for non-positive `thread_number` or `shaft`.
    pub fn add_threading(
        &self,
        pattern_id: PatternId,
        thread_number: i64,
        shaft: i64,
    ) -> StoreResult<i64> {
        self.with_repo(|repo| Ok(repo.add_threading(pattern_id, thread_number, shaft)?))
    }

    /// Appends a treadling row and returns its id.
    pub fn add_treadling(
        &self,
        pattern_id: PatternId,
        treadle_number: i64,
        shaft: i64,
    ) -> StoreResult<i64> {
        self.with_repo(|repo| Ok(repo.add_treadling(pattern_id, treadle_number, shaft)?))
    }

    /// Appends a tie-up row and returns its id.
    pub fn add_tieup(&self, pattern_id: PatternId, treadle: i64, shaft: i64) -> StoreResult<i64> {
        self.with_repo(|repo| Ok(repo.add_tieup(pattern_id, treadle, shaft)?))
    }

    pub fn list_threading(&self, pattern_id: PatternId) -> StoreResult<Vec<ThreadingEntry>> {
        self.with_repo(|repo| Ok(repo.list_threading(pattern_id)?))
    }

    pub fn list_treadling(&self, pattern_id: PatternId) -> StoreResult<Vec<TreadlingEntry>> {
        self.with_repo(|repo| Ok(repo.list_treadling(pattern_id)?))
    }

    pub fn list_tieups(&self, pattern_id: PatternId) -> StoreResult<Vec<TieUpEntry>> {
        self.with_repo(|repo| Ok(repo.list_tieups(pattern_id)?))
    }

    /// Loads a pattern with all structural rows, or `None` when `id` is
    /// unknown.
    ///
    /// The reads share one connection but no transaction; a concurrent
    /// writer may interleave between them.
    pub fn load_draft(&self, id: PatternId) -> StoreResult<Option<Draft>> {
        self.with_repo(|repo| {
            let Some(pattern) = repo.get_pattern(id)? else {
                return Ok(None);
            };
            Ok(Some(Draft {
                pattern,
                threading: repo.list_threading(id)?,
                treadling: repo.list_treadling(id)?,
                tieup: repo.list_tieups(id)?,
            }))
        })
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqlitePatternRepository<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = open_db(self.config.db_path())?;
        let repo = SqlitePatternRepository::try_new(&conn)?;
        op(&repo)
    }
}
