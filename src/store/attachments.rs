//! Content-addressed attachment storage.

use super::cancel::CancelToken;
use super::error::report;
use super::notes::from_millis;
use super::{NoteStore, StoreError, StoreResult};
use crate::domain::{
    Attachment, AttachmentMeta, AttachmentName, ContentDigest, NotePath, stored_path,
};
use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};
use std::io::{ErrorKind, Read};
use tracing::debug;

/// Bytes read from an upload body between cancellation checks.
const CHUNK_SIZE: usize = 64 * 1024;

/// Reads `reader` to the end, failing once more than `limit` bytes arrive.
///
/// At most `limit + 1` bytes are consumed, so oversized input is rejected
/// rather than truncated.
pub(crate) fn read_bounded(
    reader: impl Read,
    limit: u64,
    cancel: &CancelToken,
) -> StoreResult<Vec<u8>> {
    let mut limited = reader.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        cancel.check()?;
        let n = match limited.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(StoreError::UploadRead(e)),
        };
        bytes.extend_from_slice(&chunk[..n]);
        if bytes.len() as u64 > limit {
            return Err(StoreError::UploadTooLarge { limit });
        }
    }
    Ok(bytes)
}

fn note_path_column(path: &str, raw: String) -> StoreResult<NotePath> {
    NotePath::new(&raw).map_err(|e| StoreError::corrupt(path, e))
}

fn attachment_from_row(row: &Row<'_>) -> rusqlite::Result<(String, Vec<u8>, i64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_attachment(
    (path, bytes, ctime, note_path): (String, Vec<u8>, i64, String),
) -> StoreResult<Attachment> {
    let created = from_millis(&path, ctime)?;
    let note_path = note_path_column(&path, note_path)?;
    Ok(Attachment::new(path, bytes, created, note_path))
}

impl NoteStore {
    // ===========================================
    // Uploads
    // ===========================================

    /// Stores `bytes` as an attachment of `owner` and returns its path.
    ///
    /// The path is `.files/<sha256>/<name>`. Uploading identical bytes under
    /// the same name again is a no-op that returns the same path.
    pub fn put_attachment(
        &mut self,
        owner: &NotePath,
        filename: &str,
        bytes: &[u8],
    ) -> StoreResult<String> {
        self.put_attachment_reader(
            owner,
            filename,
            bytes,
            Some(bytes.len() as u64),
            &CancelToken::new(),
        )
    }

    /// Streams an upload body into an attachment of `owner`.
    ///
    /// A `size_hint` over the upload limit fails before anything is read.
    /// The body is read in chunks, checking `cancel` between them and again
    /// before commit; a cancelled upload leaves nothing behind.
    pub fn put_attachment_reader(
        &mut self,
        owner: &NotePath,
        filename: &str,
        reader: impl Read,
        size_hint: Option<u64>,
        cancel: &CancelToken,
    ) -> StoreResult<String> {
        self.put_inner(owner, filename, reader, size_hint, cancel)
            .inspect_err(|e| report("put_attachment", e))
    }

    fn put_inner(
        &mut self,
        owner: &NotePath,
        filename: &str,
        reader: impl Read,
        size_hint: Option<u64>,
        cancel: &CancelToken,
    ) -> StoreResult<String> {
        let name = AttachmentName::sanitize(filename)?;
        let limit = self.options.upload_limit;
        if size_hint.is_some_and(|size| size > limit) {
            return Err(StoreError::UploadTooLarge { limit });
        }
        let bytes = read_bounded(reader, limit, cancel)?;
        if bytes.is_empty() {
            return Err(StoreError::EmptyUpload);
        }

        let digest = ContentDigest::compute(&bytes);
        let path = stored_path(&digest, &name);
        let ctime = Utc::now().timestamp_millis();

        let tx = self.transaction()?;
        cancel.check()?;
        let owner_exists = tx
            .conn()
            .query_row("SELECT 1 FROM notes WHERE path = ?1", [owner.as_str()], |_| Ok(()))
            .optional()?
            .is_some();
        if !owner_exists {
            return Err(StoreError::OwnerNotFound {
                path: owner.clone(),
            });
        }
        let inserted = tx.execute(
            "INSERT INTO files (path, bytes, ctime, note_path) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(path) DO NOTHING",
            params![path, bytes, ctime, owner.as_str()],
        )?;
        cancel.check()?;
        tx.commit()?;

        debug!(
            path = %path,
            owner = %owner,
            size = bytes.len(),
            inserted = inserted > 0,
            "store: put attachment"
        );
        Ok(path)
    }

    // ===========================================
    // Reads
    // ===========================================

    /// Returns the attachment stored at `path`, or `None`.
    pub fn get_attachment(&self, path: &str) -> StoreResult<Option<Attachment>> {
        self.get_attachment_inner(path)
            .inspect_err(|e| report("get_attachment", e))
    }

    fn get_attachment_inner(&self, path: &str) -> StoreResult<Option<Attachment>> {
        let row = self
            .conn
            .query_row(
                "SELECT path, bytes, ctime, note_path FROM files WHERE path = ?1",
                [path],
                attachment_from_row,
            )
            .optional()?;
        row.map(into_attachment).transpose()
    }

    /// Lists attachments owned by `owner`, oldest first.
    pub fn attachments_of(&self, owner: &NotePath) -> StoreResult<Vec<AttachmentMeta>> {
        self.attachments_of_inner(owner)
            .inspect_err(|e| report("attachments_of", e))
    }

    fn attachments_of_inner(&self, owner: &NotePath) -> StoreResult<Vec<AttachmentMeta>> {
        let mut stmt = self.conn.prepare(
            "SELECT path, length(bytes), ctime, note_path FROM files
             WHERE note_path = ?1 ORDER BY ctime ASC, path ASC",
        )?;
        let rows = stmt.query_map([owner.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (path, size, ctime, note_path) = row?;
            out.push(AttachmentMeta {
                size: size.max(0) as u64,
                created: from_millis(&path, ctime)?,
                note_path: note_path_column(&path, note_path)?,
                path,
            });
        }
        Ok(out)
    }

    /// Returns attachments whose owning note carries `tag`, newest first.
    pub fn attachments_tagged(&self, tag: &str) -> StoreResult<Vec<Attachment>> {
        self.attachments_tagged_inner(tag)
            .inspect_err(|e| report("attachments_tagged", e))
    }

    fn attachments_tagged_inner(&self, tag: &str) -> StoreResult<Vec<Attachment>> {
        let mut stmt = self.conn.prepare(
            "SELECT f.path, f.bytes, f.ctime, f.note_path
             FROM files f JOIN notes n ON n.path = f.note_path
             WHERE EXISTS (SELECT 1 FROM json_each(n.tags) WHERE json_each.value = ?1)
             ORDER BY f.ctime DESC, f.path ASC",
        )?;
        let rows = stmt.query_map([tag], attachment_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(into_attachment(row?)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_bounded_accepts_exact_limit() {
        let data = vec![7u8; 100];
        let bytes = read_bounded(Cursor::new(&data), 100, &CancelToken::new()).unwrap();
        assert_eq!(bytes, data);
    }

    #[test]
    fn read_bounded_rejects_one_byte_over() {
        let data = vec![7u8; 101];
        let result = read_bounded(Cursor::new(&data), 100, &CancelToken::new());
        assert!(matches!(result, Err(StoreError::UploadTooLarge { limit: 100 })));
    }

    #[test]
    fn read_bounded_spans_many_chunks() {
        let data: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| i as u8).collect();
        let bytes =
            read_bounded(Cursor::new(&data), data.len() as u64, &CancelToken::new()).unwrap();
        assert_eq!(bytes, data);
    }

    #[test]
    fn read_bounded_stops_when_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = read_bounded(Cursor::new(b"data"), 100, &cancel);
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[test]
    fn read_bounded_reports_reader_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("connection reset"))
            }
        }
        let result = read_bounded(Broken, 100, &CancelToken::new());
        assert!(matches!(result, Err(StoreError::UploadRead(_))));
    }
}
