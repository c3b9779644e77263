//! SQLite schema for notes, attachments and the search index.

use rusqlite::Connection;

/// Version recorded in `schema_version` by [`create_schema`].
pub const SCHEMA_VERSION: i64 = 1;

/// Creates all tables and indexes. Idempotent.
///
/// # Tables Created
/// - `notes` - authoritative note rows keyed by path
/// - `files` - content-addressed attachments, cascade-deleted with their note
/// - `notes_fts` - FTS5 shadow of note path, title, text and tags
/// - `schema_version` - schema version tracking
///
/// The search index is maintained by the store's write path inside the same
/// transaction as the note row; there are no triggers.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS notes (
            path TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            ctime INTEGER NOT NULL,
            mtime INTEGER NOT NULL,
            tags TEXT CHECK (tags IS NULL OR (json_valid(tags) AND json_type(tags) = 'array'))
        );
        CREATE INDEX IF NOT EXISTS idx_notes_mtime ON notes(mtime DESC);",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS files (
            path TEXT PRIMARY KEY NOT NULL,
            bytes BLOB NOT NULL,
            ctime INTEGER NOT NULL,
            note_path TEXT NOT NULL REFERENCES notes(path) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_files_note_path ON files(note_path);",
    )?;

    // Keyed by path rather than rowid: VACUUM may renumber implicit rowids.
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
            path UNINDEXED,
            title,
            text,
            tags
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}
