//! Initialize-and-report entry point.
//!
//! Creates the pattern database at the default relative location, logs to
//! `./logs` and reports the outcome on stdout/stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use weaving_core::{default_log_level, flush_logs, init_logging, PatternStore, StoreConfig};

const LOG_DIR_NAME: &str = "logs";

fn main() -> ExitCode {
    match log_dir() {
        Ok(dir) => {
            if let Err(err) = init_logging(default_log_level(), &dir) {
                eprintln!("Logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("Logging disabled: cannot resolve working directory: {err}"),
    }

    let store = PatternStore::new(StoreConfig::default());
    let code = match store.initialize() {
        Ok(()) => {
            println!(
                "Database setup complete! ({}, weaving_core {})",
                store.config().db_path().display(),
                weaving_core::core_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Database setup failed: {err}");
            ExitCode::FAILURE
        }
    };
    flush_logs();
    code
}

fn log_dir() -> std::io::Result<PathBuf> {
    Ok(std::env::current_dir()?.join(LOG_DIR_NAME))
}
