//! Note reads and the atomic write path.

use super::error::report;
use super::search::{remove_entry, replace_entry};
use super::{NoteStore, StoreError, StoreResult};
use crate::domain::{Note, NotePath, Tags, derive_title, extract_tags, prepare_text};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

pub(crate) const NOTE_COLUMNS: &str = "path, title, text, ctime, mtime, tags";

/// A `notes` row before validation.
pub(crate) struct NoteRow {
    path: String,
    title: String,
    text: String,
    ctime: i64,
    mtime: i64,
    tags: Option<String>,
}

impl NoteRow {
    /// Reads a row selected with [`NOTE_COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            path: row.get(0)?,
            title: row.get(1)?,
            text: row.get(2)?,
            ctime: row.get(3)?,
            mtime: row.get(4)?,
            tags: row.get(5)?,
        })
    }

    pub(crate) fn into_note(self) -> StoreResult<Note> {
        let path = NotePath::new(&self.path).map_err(|e| StoreError::corrupt(&self.path, e))?;
        let tags = decode_tags(&self.path, self.tags.as_deref())?;
        let created = from_millis(&self.path, self.ctime)?;
        let modified = from_millis(&self.path, self.mtime)?;
        Ok(Note::new(path, self.title, self.text, tags, created, modified))
    }
}

/// Decodes the `tags` column; NULL is an empty list.
pub(crate) fn decode_tags(path: &str, raw: Option<&str>) -> StoreResult<Tags> {
    match raw {
        None => Ok(Tags::empty()),
        Some(json) => serde_json::from_str(json).map_err(|e| StoreError::corrupt(path, e)),
    }
}

/// Encodes tags for the `tags` column; an empty list is stored as NULL.
pub(crate) fn encode_tags(tags: &Tags) -> StoreResult<Option<String>> {
    if tags.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(tags)?))
    }
}

pub(crate) fn from_millis(path: &str, millis: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| StoreError::corrupt(path, format!("timestamp out of range: {millis}")))
}

pub(crate) fn collect_notes<I>(rows: I) -> StoreResult<Vec<Note>>
where
    I: Iterator<Item = rusqlite::Result<NoteRow>>,
{
    let mut notes = Vec::new();
    for row in rows {
        notes.push(row?.into_note()?);
    }
    Ok(notes)
}

impl NoteStore {
    // ===========================================
    // Reads
    // ===========================================

    /// Returns the note at `path`, or `None` if there is none.
    pub fn get(&self, path: &NotePath) -> StoreResult<Option<Note>> {
        self.get_inner(path).inspect_err(|e| report("get", e))
    }

    fn get_inner(&self, path: &NotePath) -> StoreResult<Option<Note>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE path = ?1"),
                [path.as_str()],
                NoteRow::from_row,
            )
            .optional()?;
        row.map(NoteRow::into_note).transpose()
    }

    /// Lists every note, most recently modified first.
    ///
    /// Notes sharing a modification time are ordered by path.
    pub fn list(&self) -> StoreResult<Vec<Note>> {
        self.select_notes(
            &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY mtime DESC, path ASC"),
            [],
        )
        .inspect_err(|e| report("list", e))
    }

    /// Lists notes carrying `tag`, most recently created first.
    pub fn list_tagged(&self, tag: &str) -> StoreResult<Vec<Note>> {
        self.select_notes(
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE EXISTS (SELECT 1 FROM json_each(notes.tags) WHERE json_each.value = ?1)
                 ORDER BY ctime DESC, path ASC"
            ),
            [tag],
        )
        .inspect_err(|e| report("list_tagged", e))
    }

    /// Returns the number of stored notes.
    pub fn count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .map_err(StoreError::from)
            .inspect_err(|e| report("count", e))?;
        Ok(count.max(0) as u64)
    }

    fn select_notes(&self, sql: &str, params: impl rusqlite::Params) -> StoreResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, NoteRow::from_row)?;
        collect_notes(rows)
    }

    // ===========================================
    // Writes
    // ===========================================

    /// Creates or replaces the note at `path`.
    ///
    /// The note row and its search index entry are written in one
    /// transaction. The creation time of an existing note is kept and its
    /// modification time always advances. Blank `text` fails with
    /// [`StoreError::EmptyText`].
    pub fn upsert(
        &mut self,
        path: &NotePath,
        title: &str,
        text: &str,
        tags: &Tags,
    ) -> StoreResult<Note> {
        self.upsert_at(path, title, text, tags, Utc::now())
    }

    /// [`upsert`](Self::upsert) with an explicit clock reading.
    pub fn upsert_at(
        &mut self,
        path: &NotePath,
        title: &str,
        text: &str,
        tags: &Tags,
        now: DateTime<Utc>,
    ) -> StoreResult<Note> {
        self.upsert_inner(path, title, text, tags, now)
            .inspect_err(|e| report("upsert", e))
    }

    fn upsert_inner(
        &mut self,
        path: &NotePath,
        title: &str,
        text: &str,
        tags: &Tags,
        now: DateTime<Utc>,
    ) -> StoreResult<Note> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }
        let tags_json = encode_tags(tags)?;
        let tx = self.transaction()?;

        let previous: Option<(i64, i64)> = tx
            .conn()
            .query_row(
                "SELECT ctime, mtime FROM notes WHERE path = ?1",
                [path.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let now = now.timestamp_millis();
        let (ctime, mtime) = match previous {
            Some((ctime, last)) => (ctime, now.max(last + 1)),
            None => (now, now),
        };

        tx.execute(
            "INSERT INTO notes (path, title, text, ctime, mtime, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(path) DO UPDATE SET
                 title = excluded.title,
                 text = excluded.text,
                 mtime = excluded.mtime,
                 tags = excluded.tags",
            params![path.as_str(), title, text, ctime, mtime, tags_json],
        )?;
        replace_entry(tx.conn(), path.as_str(), title, text, tags)?;
        tx.commit()?;

        debug!(
            path = %path,
            created = previous.is_none(),
            tags = tags.len(),
            "store: upserted note"
        );
        Ok(Note::new(
            path.clone(),
            title,
            text,
            tags.clone(),
            from_millis(path.as_str(), ctime)?,
            from_millis(path.as_str(), mtime)?,
        ))
    }

    /// Validates raw note text, derives its title and tags, and upserts it.
    ///
    /// The text must be UTF-8 and non-empty after trimming; CRLF line
    /// endings are normalized to LF.
    pub fn save(&mut self, path: &NotePath, raw: &[u8]) -> StoreResult<Note> {
        let text = prepare_text(raw)
            .map_err(StoreError::from)
            .inspect_err(|e| report("save", e))?;
        let title = derive_title(&text);
        let tags = extract_tags(&text);
        self.upsert(path, &title, &text, &tags)
    }

    /// Removes the note at `path` with its attachments and index entry.
    ///
    /// Removing a missing note succeeds.
    pub fn delete(&mut self, path: &NotePath) -> StoreResult<()> {
        self.delete_inner(path).inspect_err(|e| report("delete", e))
    }

    fn delete_inner(&mut self, path: &NotePath) -> StoreResult<()> {
        let tx = self.transaction()?;
        remove_entry(tx.conn(), path.as_str())?;
        let removed = tx.execute("DELETE FROM notes WHERE path = ?1", [path.as_str()])?;
        tx.commit()?;
        debug!(path = %path, existed = removed > 0, "store: deleted note");
        Ok(())
    }
}
