//! Opening stores and starting transactions.

use super::schema::create_schema;
use super::transaction::Transaction;
use super::{NoteStore, StoreError, StoreResult};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_UPLOAD_LIMIT: u64 = 10 << 20;

/// Default time a writer waits for the database lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Largest accepted attachment, in bytes.
    pub upload_limit: u64,
    /// How long a blocked writer waits before failing with `SQLITE_BUSY`.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            upload_limit: DEFAULT_UPLOAD_LIMIT,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl NoteStore {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens a private in-memory store. Used by tests and benchmarks.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;
        Ok(Self {
            conn,
            options: StoreOptions::default(),
        })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens or creates a store at `path` with default options.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Opens or creates a store at `path`.
    ///
    /// Creates parent directories if needed, switches the database to WAL
    /// mode and initializes the schema. Each worker should open its own
    /// store; connections are not shared.
    pub fn open_with(path: &Path, options: StoreOptions) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(options.busy_timeout)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;
        create_schema(&conn)?;

        debug!(path = %path.display(), journal_mode = %mode, "store: opened");
        Ok(Self { conn, options })
    }

    // ===========================================
    // Accessors
    // ===========================================

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Returns the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // ===========================================
    // Transaction Support
    // ===========================================

    /// Begins a write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so a concurrent
    /// writer waits out the busy timeout here instead of failing midway.
    /// Rolls back on drop unless committed.
    pub fn transaction(&mut self) -> StoreResult<Transaction<'_>> {
        Transaction::begin(&self.conn, "BEGIN IMMEDIATE")
    }

    /// Begins a read transaction for a consistent snapshot across queries.
    pub(crate) fn read_transaction(&self) -> StoreResult<Transaction<'_>> {
        Transaction::begin(&self.conn, "BEGIN")
    }
}
