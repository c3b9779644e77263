//! RAII transaction guard.

use super::StoreResult;
use rusqlite::{Connection, Params};

/// An open transaction that rolls back when dropped uncommitted.
///
/// Returning early with `?` or failing a cancellation check drops the guard,
/// so no partial write is ever committed.
pub struct Transaction<'a> {
    conn: &'a Connection,
    finished: bool,
}

impl<'a> Transaction<'a> {
    /// Runs `begin` (a `BEGIN …` statement) and wraps the connection.
    pub(crate) fn begin(conn: &'a Connection, begin: &str) -> StoreResult<Self> {
        conn.execute_batch(begin)?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        self.conn
    }

    pub fn execute(&self, sql: &str, params: impl Params) -> StoreResult<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    pub fn commit(mut self) -> StoreResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        Ok(())
    }

    pub fn rollback(mut self) -> StoreResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            // Nothing useful can be done with a rollback error during drop.
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
