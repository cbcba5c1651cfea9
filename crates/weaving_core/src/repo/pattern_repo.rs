//! Pattern repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `NewPattern::validate()` / `validate_index()` first.
//! - Structural rows are only ever inserted; they disappear through
//!   `ON DELETE CASCADE` when their pattern is deleted.
//! - Constraint failures reported by SQLite surface as
//!   `RepoError::ConstraintViolation`.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::draft::{validate_index, ThreadingEntry, TieUpEntry, TreadlingEntry};
use crate::model::pattern::{NewPattern, Pattern, PatternId, PatternValidationError};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PATTERN_SELECT_SQL: &str = "SELECT id, name, shafts, treadles, created_at FROM patterns";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pattern persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PatternValidationError),
    /// A declared constraint rejected the write, e.g. an unknown `pattern_id`.
    ConstraintViolation(rusqlite::Error),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pattern data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::ConstraintViolation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<PatternValidationError> for RepoError {
    fn from(value: PatternValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            Self::ConstraintViolation(value)
        } else {
            Self::Db(DbError::Sqlite(value))
        }
    }
}

/// Repository interface for patterns and their structural rows.
pub trait PatternRepository {
    fn create_pattern(&self, pattern: &NewPattern) -> RepoResult<PatternId>;
    /// Returns whether a row matched `id`.
    fn update_pattern(&self, id: PatternId, pattern: &NewPattern) -> RepoResult<bool>;
    /// Returns whether a row matched `id`.
    fn delete_pattern(&self, id: PatternId) -> RepoResult<bool>;
    fn get_pattern(&self, id: PatternId) -> RepoResult<Option<Pattern>>;
    fn list_patterns(&self) -> RepoResult<Vec<Pattern>>;
    fn add_threading(
        &self,
        pattern_id: PatternId,
        thread_number: i64,
        shaft: i64,
    ) -> RepoResult<i64>;
    fn add_treadling(
        &self,
        pattern_id: PatternId,
        treadle_number: i64,
        shaft: i64,
    ) -> RepoResult<i64>;
    fn add_tieup(&self, pattern_id: PatternId, treadle: i64, shaft: i64) -> RepoResult<i64>;
    fn list_threading(&self, pattern_id: PatternId) -> RepoResult<Vec<ThreadingEntry>>;
    fn list_treadling(&self, pattern_id: PatternId) -> RepoResult<Vec<TreadlingEntry>>;
    fn list_tieups(&self, pattern_id: PatternId) -> RepoResult<Vec<TieUpEntry>>;
}

/// SQLite-backed pattern repository over a borrowed connection.
pub struct SqlitePatternRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePatternRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current,
    ///   i.e. the connection did not come from `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl PatternRepository for SqlitePatternRepository<'_> {
    fn create_pattern(&self, pattern: &NewPattern) -> RepoResult<PatternId> {
        pattern.validate()?;

        self.conn.execute(
            "INSERT INTO patterns (name, shafts, treadles) VALUES (?1, ?2, ?3);",
            params![pattern.name.as_str(), pattern.shafts, pattern.treadles],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_pattern(&self, id: PatternId, pattern: &NewPattern) -> RepoResult<bool> {
        pattern.validate()?;

        let changed = self.conn.execute(
            "UPDATE patterns
             SET name = ?1, shafts = ?2, treadles = ?3
             WHERE id = ?4;",
            params![pattern.name.as_str(), pattern.shafts, pattern.treadles, id],
        )?;

        Ok(changed > 0)
    }

    fn delete_pattern(&self, id: PatternId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM patterns WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn get_pattern(&self, id: PatternId) -> RepoResult<Option<Pattern>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PATTERN_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pattern_row(row)?));
        }
        Ok(None)
    }

    fn list_patterns(&self) -> RepoResult<Vec<Pattern>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PATTERN_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut patterns = Vec::new();
        while let Some(row) = rows.next()? {
            patterns.push(parse_pattern_row(row)?);
        }
        Ok(patterns)
    }

    fn add_threading(
        &self,
        pattern_id: PatternId,
        thread_number: i64,
        shaft: i64,
    ) -> RepoResult<i64> {
        validate_index("thread_number", thread_number)?;
        validate_index("shaft", shaft)?;
        self.insert_structural_row(
            "INSERT INTO threading (pattern_id, thread_number, shaft) VALUES (?1, ?2, ?3);",
            pattern_id,
            thread_number,
            shaft,
        )
    }

    fn add_treadling(
        &self,
        pattern_id: PatternId,
        treadle_number: i64,
        shaft: i64,
    ) -> RepoResult<i64> {
        validate_index("treadle_number", treadle_number)?;
        validate_index("shaft", shaft)?;
        self.insert_structural_row(
            "INSERT INTO treadling (pattern_id, treadle_number, shaft) VALUES (?1, ?2, ?3);",
            pattern_id,
            treadle_number,
            shaft,
        )
    }

    fn add_tieup(&self, pattern_id: PatternId, treadle: i64, shaft: i64) -> RepoResult<i64> {
        validate_index("treadle", treadle)?;
        validate_index("shaft", shaft)?;
        self.insert_structural_row(
            "INSERT INTO tieups (pattern_id, treadle, shaft) VALUES (?1, ?2, ?3);",
            pattern_id,
            treadle,
            shaft,
        )
    }

    fn list_threading(&self, pattern_id: PatternId) -> RepoResult<Vec<ThreadingEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pattern_id, thread_number, shaft
             FROM threading
             WHERE pattern_id = ?1
             ORDER BY thread_number ASC, id ASC;",
        )?;
        let entries = stmt
            .query_map([pattern_id], |row| {
                Ok(ThreadingEntry {
                    id: row.get("id")?,
                    pattern_id: row.get("pattern_id")?,
                    thread_number: row.get("thread_number")?,
                    shaft: row.get("shaft")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn list_treadling(&self, pattern_id: PatternId) -> RepoResult<Vec<TreadlingEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pattern_id, treadle_number, shaft
             FROM treadling
             WHERE pattern_id = ?1
             ORDER BY treadle_number ASC, id ASC;",
        )?;
        let entries = stmt
            .query_map([pattern_id], |row| {
                Ok(TreadlingEntry {
                    id: row.get("id")?,
                    pattern_id: row.get("pattern_id")?,
                    treadle_number: row.get("treadle_number")?,
                    shaft: row.get("shaft")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn list_tieups(&self, pattern_id: PatternId) -> RepoResult<Vec<TieUpEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pattern_id, treadle, shaft
             FROM tieups
             WHERE pattern_id = ?1
             ORDER BY treadle ASC, shaft ASC, id ASC;",
        )?;
        let entries = stmt
            .query_map([pattern_id], |row| {
                Ok(TieUpEntry {
                    id: row.get("id")?,
                    pattern_id: row.get("pattern_id")?,
                    treadle: row.get("treadle")?,
                    shaft: row.get("shaft")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl SqlitePatternRepository<'_> {
    fn insert_structural_row(
        &self,
        sql: &str,
        pattern_id: PatternId,
        position: i64,
        shaft: i64,
    ) -> RepoResult<i64> {
        self.conn.execute(sql, params![pattern_id, position, shaft])?;
        Ok(self.conn.last_insert_rowid())
    }
}

fn parse_pattern_row(row: &Row<'_>) -> RepoResult<Pattern> {
    let id: PatternId = row.get("id")?;

    Ok(Pattern {
        id,
        name: pattern_column(row, id, "name")?,
        shafts: pattern_column(row, id, "shafts")?,
        treadles: pattern_column(row, id, "treadles")?,
        created_at: pattern_column(row, id, "created_at")?,
    })
}

/// Reads one `patterns` column, reporting type mismatches left behind by
/// unvalidated writers as `InvalidData` for that row and column.
fn pattern_column<T: FromSql>(row: &Row<'_>, id: PatternId, column: &str) -> RepoResult<T> {
    row.get(column).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..) => {
            RepoError::InvalidData(format!(
                "unreadable value for pattern {id} in patterns.{column}: {err}"
            ))
        }
        other => RepoError::from(other),
    })
}
