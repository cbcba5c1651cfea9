use crate::db::DbError;
use crate::model::pattern::PatternValidationError;
use crate::repo::pattern_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure surface of `PatternStore` operations.
///
/// Engine errors are carried unmodified as `source()`; nothing is retried.
#[derive(Debug)]
pub enum StoreError {
    /// The backing file could not be opened, created or bootstrapped.
    StorageUnavailable(DbError),
    /// The connection's schema version is not the one this binary writes.
    SchemaMismatch {
        expected_version: u32,
        actual_version: u32,
    },
    /// A declared constraint rejected the write (e.g. unknown `pattern_id`).
    ConstraintViolation(rusqlite::Error),
    Validation(PatternValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "pattern storage unavailable: {err}"),
            Self::SchemaMismatch {
                expected_version,
                actual_version,
            } => write!(
                f,
                "pattern storage schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pattern data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) | Self::Db(err) => Some(err),
            Self::ConstraintViolation(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::SchemaMismatch { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        if value.is_storage_failure() {
            return Self::StorageUnavailable(value);
        }
        RepoError::from(value).into()
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::ConstraintViolation(err) => Self::ConstraintViolation(err),
            RepoError::Db(err) if err.is_storage_failure() => Self::StorageUnavailable(err),
            RepoError::Db(err) => Self::Db(err),
            RepoError::InvalidData(message) => Self::InvalidData(message),
            RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            } => Self::SchemaMismatch {
                expected_version,
                actual_version,
            },
        }
    }
}
