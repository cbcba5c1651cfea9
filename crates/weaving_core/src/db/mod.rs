//! Pattern database bootstrap: connection setup and schema migrations.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Pattern data is never read or written before migrations succeed.
//! - Failures that leave the file unusable carry the location that failed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Where a connection was opened: a file path, or `:memory:`.
pub type DbLocation = PathBuf;

#[derive(Debug)]
pub enum DbError {
    /// The file could not be opened or created (permissions, missing
    /// directory, not a database).
    Open {
        location: DbLocation,
        source: rusqlite::Error,
    },
    /// The file opened but pragmas or migrations failed on it.
    Bootstrap {
        location: DbLocation,
        source: rusqlite::Error,
    },
    /// The file was written by a newer schema than this binary knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A statement failed on an already bootstrapped connection.
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Whether the backing storage itself is unusable, as opposed to one
    /// statement failing on a healthy connection.
    pub fn is_storage_failure(&self) -> bool {
        !matches!(self, Self::Sqlite(_))
    }

    /// The engine error underneath, when there is one.
    pub fn sqlite_error(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Open { source, .. } | Self::Bootstrap { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => write!(
                f,
                "cannot open pattern database `{}`: {source}",
                location.display()
            ),
            Self::Bootstrap { location, source } => write!(
                f,
                "cannot prepare pattern database `{}`: {source}",
                location.display()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "pattern database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.sqlite_error().map(|err| err as &(dyn Error + 'static))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
