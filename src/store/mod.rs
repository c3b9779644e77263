//! SQLite-backed note store with a transactional full-text index and
//! content-addressed attachments.

mod attachments;
mod backup;
mod cancel;
mod connection;
mod error;
mod notes;
pub mod schema;
mod search;
mod transaction;


use rusqlite::Connection;

pub use cancel::CancelToken;
pub use connection::{DEFAULT_BUSY_TIMEOUT, DEFAULT_UPLOAD_LIMIT, StoreOptions};
pub use error::{StoreError, StoreResult};
pub use search::{IndexReport, MATCH_CLOSE, MATCH_OPEN, SearchHit, Snippet};
pub use transaction::Transaction;

// ===========================================
// NoteStore Struct
// ===========================================

/// Persistent store of notes and their attachments.
///
/// Every write updates the note row and its search index entry in one
/// transaction. A store owns one connection and is meant to be used by one
/// worker; open one store per thread against the same database file.
pub struct NoteStore {
    pub(crate) conn: Connection,
    pub(crate) options: StoreOptions,
}
