//! Store error type.

use crate::domain::{FilenameError, NotePath, NotePathError, TextError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by [`NoteStore`](super::NoteStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The note path is not a safe relative path.
    #[error("invalid note path: {0}")]
    InvalidPath(#[from] NotePathError),

    /// The attachment filename was rejected.
    #[error("invalid file name: {0}")]
    InvalidFilename(#[from] FilenameError),

    /// The note text is empty after trimming.
    #[error("note text is empty")]
    EmptyText,

    /// The note text is not valid UTF-8.
    #[error("note text is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidEncoding { offset: usize },

    /// The full-text match expression could not be parsed.
    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("upload exceeds the limit of {limit} bytes")]
    UploadTooLarge { limit: u64 },

    #[error("upload is empty")]
    EmptyUpload,

    #[error("operation cancelled")]
    Cancelled,

    /// An upload named a note that does not exist.
    #[error("note not found: {path}")]
    OwnerNotFound { path: NotePath },

    /// Reading the upload body failed.
    #[error("reading upload: {0}")]
    UploadRead(#[source] std::io::Error),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored row could not be decoded.
    #[error("corrupt row for {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("encoding tags: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<TextError> for StoreError {
    fn from(err: TextError) -> Self {
        match err {
            TextError::Empty => Self::EmptyText,
            TextError::InvalidEncoding { offset } => Self::InvalidEncoding { offset },
        }
    }
}

impl StoreError {
    /// Returns `true` for errors caused by the caller's input rather than
    /// by storage.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath(_)
                | Self::InvalidFilename(_)
                | Self::EmptyText
                | Self::InvalidEncoding { .. }
                | Self::InvalidQuery(_)
                | Self::UploadTooLarge { .. }
                | Self::EmptyUpload
                | Self::Cancelled
        )
    }

    /// Returns `true` if the error names a note that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OwnerNotFound { .. })
    }

    pub(crate) fn corrupt(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Logs a failed store operation at a level matching its cause.
pub(crate) fn report(op: &'static str, err: &StoreError) {
    if err.is_invalid_input() || err.is_not_found() {
        warn!(op, error = %err, "store: rejected");
    } else {
        error!(op, error = %err, "store: failed");
    }
}
