//! The stored note and the text checks applied before it is written.

use super::{NotePath, Tags};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Title used when a note's first line has no usable text.
pub const UNTITLED: &str = "Untitled";

/// Errors for note text rejected at the write boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("note text is empty")]
    Empty,

    #[error("note text is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidEncoding { offset: usize },
}

/// A note as committed to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    path: NotePath,
    title: String,
    text: String,
    tags: Tags,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl Note {
    pub(crate) fn new(
        path: NotePath,
        title: impl Into<String>,
        text: impl Into<String>,
        tags: Tags,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            path,
            title: title.into(),
            text: text.into(),
            tags,
            created,
            modified,
        }
    }

    pub fn path(&self) -> &NotePath {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw markdown text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the note's tags; empty when the note has none.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Returns when the note was first saved.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns when the note was last saved.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

/// Validates raw note bytes and normalizes them for storage.
///
/// The bytes must be UTF-8. Surrounding whitespace is trimmed and CRLF line
/// endings become LF. Text that is empty after trimming is rejected.
///
/// # Examples
///
/// ```
/// use quire::domain::prepare_text;
///
/// assert_eq!(prepare_text(b"  # Hi\r\n\r\nthere\r\n").unwrap(), "# Hi\n\nthere");
/// assert!(prepare_text(b"   ").is_err());
/// assert!(prepare_text(&[0xff, 0xfe]).is_err());
/// ```
pub fn prepare_text(raw: &[u8]) -> Result<String, TextError> {
    let text = std::str::from_utf8(raw).map_err(|e| TextError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(TextError::Empty);
    }
    Ok(text.replace("\r\n", "\n"))
}

/// Derives a title from the first line of note text.
///
/// Leading and trailing `#`, spaces, tabs and line breaks are stripped, so a
/// level-one heading on the first line becomes the title. Falls back to
/// [`UNTITLED`].
pub fn derive_title(text: &str) -> String {
    const CUTSET: &[char] = &['#', '\t', '\r', '\n', ' '];
    let first_line = text.split('\n').next().unwrap_or_default();
    let title = first_line.trim_matches(CUTSET);
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}
