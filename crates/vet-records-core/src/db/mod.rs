//! Local document store.
//!
//! Keeps ingested documents and the latest edited record for each. This is
//! a local cache for the editor, not the server of record.

mod documents;
mod schema;
mod sink;

pub use schema::*;
pub use sink::*;

use rusqlite::Connection;
use thiserror::Error;

use crate::config::{CoreConfig, DatabaseLocation};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
    skip_unchanged_writes: bool,
}

impl Database {
    /// Open the database described by `config`, creating it if needed.
    pub fn open(config: &CoreConfig) -> DbResult<Self> {
        let conn = match config.database() {
            DatabaseLocation::InMemory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => Connection::open(path)?,
        };
        let db = Self {
            conn,
            skip_unchanged_writes: config.skip_unchanged_writes(),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&CoreConfig::in_memory())
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
