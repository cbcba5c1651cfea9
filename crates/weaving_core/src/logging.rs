//! Rolling file log bootstrap for pattern store hosts.
//!
//! # Invariants
//! - Logging is initialized at most once per process.
//! - Repeating initialization with the same level and directory is a no-op.
//! - A different level or directory after the first init is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "weaving";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    handle: LoggerHandle,
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unsupported `level` (`off` included), or empty / relative `log_dir`.
/// - Directory creation or logger startup failure.
/// - A previous init used a different level or directory.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), String> {
    let level = normalize_level(level)?;
    let log_dir = absolute_log_dir(log_dir.as_ref())?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, &log_dir))?;

    if state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{level}`",
            state.level
        ));
    }
    Ok(())
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// Writes buffered log lines to disk. No-op before `init_logging`.
pub fn flush_logs() {
    if let Some(state) = LOGGING_STATE.get() {
        state.handle.flush();
    }
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=logging_init module=core status=ok level={level} log_dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    let requested = level.trim();
    if requested.eq_ignore_ascii_case("warning") {
        return Ok("warn");
    }
    // `off` is a valid filter but not an accepted level.
    match requested.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{requested}`; expected trace|debug|info|warn|error"
        )),
        Ok(filter) => Ok(level_name(filter)),
    }
}

fn level_name(filter: LevelFilter) -> &'static str {
    match filter {
        LevelFilter::Trace => "trace",
        LevelFilter::Debug => "debug",
        LevelFilter::Info => "info",
        LevelFilter::Warn => "warn",
        LevelFilter::Error | LevelFilter::Off => "error",
    }
}

fn absolute_log_dir(log_dir: &Path) -> Result<PathBuf, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log directory path is empty".to_string());
    }
    if log_dir.is_relative() {
        return Err(format!(
            "log directory `{}` is relative; an absolute path is required",
            log_dir.display()
        ));
    }
    Ok(log_dir.to_path_buf())
}
