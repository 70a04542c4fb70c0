//! Core runtime configuration.
//!
//! Resolved once by the host application and passed into the store and the
//! ingestion layer. Nothing in this crate reads environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest accepted upload (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidInput(String),
}

/// Where the local document store lives.
#[derive(Clone, Debug, PartialEq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database: DatabaseLocation,
    max_upload_bytes: u64,
    skip_unchanged_writes: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        database: DatabaseLocation,
        max_upload_bytes: u64,
        skip_unchanged_writes: bool,
    ) -> Result<Self, ConfigError> {
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidInput(
                "max_upload_bytes must be greater than zero".into(),
            ));
        }
        if let DatabaseLocation::File(path) = &database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidInput("database path cannot be empty".into()));
            }
        }

        Ok(Self {
            database,
            max_upload_bytes,
            skip_unchanged_writes,
        })
    }

    /// Defaults with an on-disk database.
    pub fn with_database_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::new(
            DatabaseLocation::File(path.as_ref().to_path_buf()),
            DEFAULT_MAX_UPLOAD_BYTES,
            true,
        )
    }

    /// Defaults with an in-memory database (for testing).
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            skip_unchanged_writes: true,
        }
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Whether the store skips writing a record identical to the stored one.
    pub fn skip_unchanged_writes(&self) -> bool {
        self.skip_unchanged_writes
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}
