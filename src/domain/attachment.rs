//! Content-addressed attachment naming.

use super::NotePath;
use super::path::ATTACHMENTS_ROOT;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// SHA-256 digest of attachment bytes, as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    hex: String,
}

/// Errors when parsing a digest from a hex string.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("invalid digest: expected 64 hex characters, got {0} characters")]
    InvalidLength(usize),

    #[error("invalid hex character at position {position}: '{character}'")]
    InvalidCharacter { position: usize, character: char },
}

impl ContentDigest {
    /// Hashes the given bytes.
    pub fn compute(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self {
            hex: format!("{:x}", digest),
        }
    }

    /// Parses a digest previously produced by [`ContentDigest::compute`].
    ///
    /// Uppercase input is normalized to lowercase.
    pub fn from_hex(hex: &str) -> Result<Self, DigestError> {
        if hex.len() != 64 {
            return Err(DigestError::InvalidLength(hex.len()));
        }
        if let Some((position, character)) =
            hex.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return Err(DigestError::InvalidCharacter {
                position,
                character,
            });
        }
        Ok(Self {
            hex: hex.to_ascii_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Reasons an uploaded filename is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    #[error("file name is empty")]
    Empty,

    #[error("file name {0:?} is a path traversal")]
    Traversal(String),

    #[error("file name {0:?} contains control characters")]
    ControlCharacter(String),
}

/// A filename reduced to its final path component.
///
/// Client-supplied names may carry directories (`C:\Users\me\cat.png`,
/// `../../etc/passwd`); only the last component is kept, and names that are
/// empty or resolve to `.`/`..` are rejected.
///
/// # Examples
///
/// ```
/// use quire::domain::AttachmentName;
///
/// assert_eq!(AttachmentName::sanitize("photos/cat.png").unwrap().as_str(), "cat.png");
/// assert_eq!(AttachmentName::sanitize(r"C:\tmp\doc.pdf").unwrap().as_str(), "doc.pdf");
/// assert!(AttachmentName::sanitize("..").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentName(String);

impl AttachmentName {
    pub fn sanitize(raw: &str) -> Result<Self, FilenameError> {
        let trimmed = raw.trim_end_matches(['/', '\\']);
        let base = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();
        if base.trim().is_empty() {
            return Err(FilenameError::Empty);
        }
        if base == "." || base == ".." {
            return Err(FilenameError::Traversal(raw.to_string()));
        }
        if base.chars().any(char::is_control) {
            return Err(FilenameError::ControlCharacter(raw.to_string()));
        }
        Ok(Self(base.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the stored path for an attachment: `.files/<digest>/<name>`.
pub fn stored_path(digest: &ContentDigest, name: &AttachmentName) -> String {
    format!("{ATTACHMENTS_ROOT}/{digest}/{name}")
}

/// Returns `true` if `path` has the shape produced by [`stored_path`].
pub fn is_stored_path(path: &str) -> bool {
    let mut parts = path.splitn(3, '/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(root), Some(digest), Some(name)) => {
            root == ATTACHMENTS_ROOT
                && ContentDigest::from_hex(digest).is_ok()
                && AttachmentName::sanitize(name).is_ok_and(|n| n.as_str() == name)
        }
        _ => false,
    }
}

/// A stored attachment with its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    path: String,
    bytes: Vec<u8>,
    created: DateTime<Utc>,
    note_path: NotePath,
}

impl Attachment {
    pub(crate) fn new(
        path: String,
        bytes: Vec<u8>,
        created: DateTime<Utc>,
        note_path: NotePath,
    ) -> Self {
        Self {
            path,
            bytes,
            created,
            note_path,
        }
    }

    /// Returns the stored path (`.files/<digest>/<name>`).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the final component of the stored path.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Returns the path of the note that owns this attachment.
    pub fn note_path(&self) -> &NotePath {
        &self.note_path
    }

    /// Returns the listing metadata for this attachment.
    pub fn meta(&self) -> AttachmentMeta {
        AttachmentMeta {
            path: self.path.clone(),
            size: self.size(),
            created: self.created,
            note_path: self.note_path.clone(),
        }
    }
}

/// Attachment metadata without the body, for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentMeta {
    pub path: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub note_path: NotePath,
}
