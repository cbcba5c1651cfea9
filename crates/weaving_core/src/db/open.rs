//! Connection bootstrap for the pattern database.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, so `ON DELETE CASCADE`
//!   and `pattern_id` references are enforced.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbLocation, DbResult};
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const MEMORY_LOCATION: &str = ":memory:";

/// Opens (creating if absent) a pattern database file and applies all
/// pending migrations.
///
/// # Side effects
/// - Creates the file on disk when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(path.to_path_buf(), || Connection::open(path))
}

/// Opens an in-memory pattern database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(DbLocation::from(MEMORY_LOCATION), Connection::open_in_memory)
}

fn open_with(
    location: DbLocation,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    debug!(
        "event=db_open module=db status=start location={}",
        location.display()
    );

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(source) => {
            let err = DbError::Open { location, source };
            log_open_failure("db_open_failed", started_at, &err);
            return Err(err);
        }
    };

    if let Err(err) = bootstrap_connection(&mut conn) {
        let err = match err {
            DbError::Sqlite(source) => DbError::Bootstrap { location, source },
            other => other,
        };
        log_open_failure("db_bootstrap_failed", started_at, &err);
        return Err(err);
    }

    debug!(
        "event=db_open module=db status=ok location={} duration_ms={}",
        location.display(),
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}

fn log_open_failure(error_code: &str, started_at: Instant, err: &DbError) {
    error!(
        "event=db_open module=db status=error duration_ms={} error_code={error_code} error={err}",
        started_at.elapsed().as_millis()
    );
}
