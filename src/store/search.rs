//! Full-text search index maintenance and queries.

use super::error::report;
use super::notes::{NOTE_COLUMNS, NoteRow, decode_tags};
use super::{NoteStore, StoreError, StoreResult};
use crate::domain::{NotePath, Tags};
use crate::render::push_escaped;
use rusqlite::Connection;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Marks the start of a matched span inside a raw [`Snippet`].
pub const MATCH_OPEN: char = '\u{E000}';

/// Marks the end of a matched span inside a raw [`Snippet`].
pub const MATCH_CLOSE: char = '\u{E001}';

// ===========================================
// Index Maintenance
// ===========================================

fn index_tags(tags: &Tags) -> String {
    index_text(&tags.as_slice().join(" "))
}

/// Text as written to the index: the snippet sentinels are removed so that
/// stored content can never open or close a match span.
fn index_text(text: &str) -> String {
    text.replace([MATCH_OPEN, MATCH_CLOSE], "")
}

/// Replaces the index entry for `path`. Call inside the note's write
/// transaction.
pub(crate) fn replace_entry(
    conn: &Connection,
    path: &str,
    title: &str,
    text: &str,
    tags: &Tags,
) -> StoreResult<()> {
    remove_entry(conn, path)?;
    insert_entry(conn, path, title, text, tags)
}

fn insert_entry(
    conn: &Connection,
    path: &str,
    title: &str,
    text: &str,
    tags: &Tags,
) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO notes_fts (path, title, text, tags) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![path, index_text(title), index_text(text), index_tags(tags)],
    )?;
    Ok(())
}

/// Removes the index entry for `path`, if any.
pub(crate) fn remove_entry(conn: &Connection, path: &str) -> StoreResult<()> {
    conn.execute("DELETE FROM notes_fts WHERE path = ?1", [path])?;
    Ok(())
}

// ===========================================
// Snippets
// ===========================================

/// Excerpt of a matching note with match spans delimited by
/// [`MATCH_OPEN`] and [`MATCH_CLOSE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet(String);

impl Snippet {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw text including sentinels.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Renders the snippet as HTML, wrapping matches in `open` and `close`.
    ///
    /// All other text is escaped. Sentinels that would nest or close an
    /// unopened span are dropped and an unclosed span is closed at the end,
    /// so every `open` has a matching `close`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quire::store::Snippet;
    ///
    /// let snippet = Snippet::new("a <\u{E000}b\u{E001}> c");
    /// assert_eq!(snippet.to_html("<mark>", "</mark>"), "a &lt;<mark>b</mark>&gt; c");
    /// ```
    pub fn to_html(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + 16);
        let mut in_match = false;
        let mut buf = [0u8; 4];
        for c in self.0.chars() {
            match c {
                MATCH_OPEN if !in_match => {
                    out.push_str(open);
                    in_match = true;
                }
                MATCH_CLOSE if in_match => {
                    out.push_str(close);
                    in_match = false;
                }
                MATCH_OPEN | MATCH_CLOSE => {}
                _ => push_escaped(&mut out, c.encode_utf8(&mut buf)),
            }
        }
        if in_match {
            out.push_str(close);
        }
        out
    }

    /// Returns the snippet text with all sentinels removed.
    pub fn plain(&self) -> String {
        self.0
            .chars()
            .filter(|c| *c != MATCH_OPEN && *c != MATCH_CLOSE)
            .collect()
    }
}

impl Serialize for Snippet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.plain())
    }
}

// ===========================================
// Search Results
// ===========================================

/// A note matching a search, with its relevance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub path: NotePath,
    pub title: String,
    pub tags: Tags,
    pub snippet: Snippet,
    /// Relevance score; higher is better.
    pub rank: f64,
}

/// Differences between notes and their search index entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// Notes without an index entry.
    pub missing: Vec<String>,
    /// Index entries without a note.
    pub orphaned: Vec<String>,
    /// Notes whose index entry differs from their content or is duplicated.
    pub stale: Vec<String>,
}

impl IndexReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty() && self.stale.is_empty()
    }
}

/// Maps errors from running a match expression.
///
/// The statement text is fixed, so a plain `SQLITE_ERROR` can only come from
/// the caller's expression. Busy, locked, I/O and corruption codes remain
/// storage faults.
fn query_error(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == rusqlite::ErrorCode::Unknown =>
        {
            StoreError::InvalidQuery(message.clone().unwrap_or_else(|| err.to_string()))
        }
        _ => StoreError::Database(err),
    }
}

impl NoteStore {
    /// Runs an FTS5 match expression, best matches first.
    ///
    /// Ranking weighs title matches over tag matches over body matches. An
    /// empty query returns nothing; a malformed one fails with
    /// [`StoreError::InvalidQuery`] and returns no partial results.
    pub fn search(&self, query: &str) -> StoreResult<Vec<SearchHit>> {
        self.search_inner(query).inspect_err(|e| report("search", e))
    }

    fn search_inner(&self, query: &str) -> StoreResult<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Column weights: path (unindexed), title, text, tags.
        let mut stmt = self.conn.prepare(
            "SELECT n.path, n.title, n.tags,
                    -bm25(notes_fts, 0.0, 10.0, 1.0, 5.0) AS score,
                    snippet(notes_fts, -1, ?2, ?3, '…', 24)
             FROM notes_fts
             JOIN notes n ON n.path = notes_fts.path
             WHERE notes_fts MATCH ?1
             ORDER BY score DESC, n.path ASC",
        )?;
        let rows = stmt
            .query_map(
                rusqlite::params![query, MATCH_OPEN.to_string(), MATCH_CLOSE.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .map_err(query_error)?;

        let mut raw = Vec::new();
        for row in rows {
            raw.push(row.map_err(query_error)?);
        }

        let mut hits = Vec::with_capacity(raw.len());
        for (path, title, tags, rank, snippet) in raw {
            let tags = decode_tags(&path, tags.as_deref())?;
            let path = NotePath::new(&path).map_err(|e| StoreError::corrupt(&path, e))?;
            hits.push(SearchHit {
                path,
                title,
                tags,
                snippet: Snippet(snippet),
                rank,
            });
        }
        debug!(query, hits = hits.len(), "store: search");
        Ok(hits)
    }

    /// Compares every note with its search index entry.
    pub fn check_search_index(&self) -> StoreResult<IndexReport> {
        self.check_inner().inspect_err(|e| report("check_search_index", e))
    }

    fn check_inner(&self) -> StoreResult<IndexReport> {
        let tx = self.read_transaction()?;
        let conn = tx.conn();

        let paths = |sql: &str| -> StoreResult<Vec<String>> {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            Ok(rows.collect::<rusqlite::Result<_>>()?)
        };
        let missing = paths(
            "SELECT path FROM notes WHERE path NOT IN (SELECT path FROM notes_fts) ORDER BY path",
        )?;
        let orphaned = paths(
            "SELECT DISTINCT path FROM notes_fts WHERE path NOT IN (SELECT path FROM notes) ORDER BY path",
        )?;
        let mut stale: BTreeSet<String> = paths(
            "SELECT path FROM notes_fts WHERE path IN (SELECT path FROM notes)
             GROUP BY path HAVING COUNT(*) > 1",
        )?
        .into_iter()
        .collect();

        let mut stmt = conn.prepare(
            "SELECT n.path, n.title, n.text, n.tags, f.title, f.text, f.tags
             FROM notes n JOIN notes_fts f ON f.path = n.path",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;
        for row in rows {
            let (path, title, text, tags, indexed_title, indexed_text, indexed_tags) = row?;
            let tags = decode_tags(&path, tags.as_deref())?;
            if index_text(&title) != indexed_title
                || index_text(&text) != indexed_text
                || index_tags(&tags) != indexed_tags
            {
                stale.insert(path);
            }
        }
        drop(stmt);
        tx.commit()?;

        Ok(IndexReport {
            missing,
            orphaned,
            stale: stale.into_iter().collect(),
        })
    }

    /// Re-derives every search index entry from the stored notes.
    ///
    /// Returns the number of entries written.
    pub fn rebuild_search_index(&mut self) -> StoreResult<usize> {
        self.rebuild_inner()
            .inspect_err(|e| report("rebuild_search_index", e))
    }

    fn rebuild_inner(&mut self) -> StoreResult<usize> {
        let tx = self.transaction()?;
        tx.execute("DELETE FROM notes_fts", [])?;

        let mut stmt = tx
            .conn()
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes"))?;
        let rows = stmt.query_map([], NoteRow::from_row)?;
        let mut written = 0;
        for row in rows {
            let note = row?.into_note()?;
            insert_entry(
                tx.conn(),
                note.path().as_str(),
                note.title(),
                note.text(),
                note.tags(),
            )?;
            written += 1;
        }
        drop(stmt);
        tx.commit()?;

        info!(entries = written, "store: rebuilt search index");
        Ok(written)
    }
}
