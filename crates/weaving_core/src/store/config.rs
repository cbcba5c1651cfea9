use std::path::{Path, PathBuf};

/// File name used when no location is injected, relative to the working
/// directory.
pub const DEFAULT_DB_FILE: &str = "weaving_program.db";

/// Storage location of the pattern database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE)
    }
}
