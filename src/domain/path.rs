//! Validated note paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First path segment reserved for stored attachments.
pub const ATTACHMENTS_ROOT: &str = ".files";

/// The identity of a note: a safe, slash-separated relative path.
///
/// # Validation Rules
/// - Non-empty
/// - No leading or trailing `/`
/// - No empty, `.` or `..` segments
/// - No backslashes, NUL or other control characters
/// - The first segment must not be the attachment namespace (`.files`)
///
/// # Examples
///
/// ```
/// use quire::domain::NotePath;
///
/// let path = NotePath::new("projects/quire.md").unwrap();
/// assert_eq!(path.as_str(), "projects/quire.md");
///
/// assert!(NotePath::new("../etc/passwd").is_err());
/// assert!(NotePath::new("/absolute").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotePath(String);

/// Error returned when a string is not a safe note path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotePathError {
    #[error("path cannot be empty")]
    Empty,

    #[error("path must be relative: {0:?}")]
    Absolute(String),

    #[error("path must not end with a slash: {0:?}")]
    TrailingSlash(String),

    #[error("path contains an invalid segment {segment:?}: {path:?}")]
    InvalidSegment { path: String, segment: String },

    #[error("path contains a forbidden character {character:?}: {path:?}")]
    ForbiddenCharacter { path: String, character: char },

    #[error("path is inside the reserved .files namespace: {0:?}")]
    Reserved(String),
}

impl NotePath {
    /// Validates and wraps a note path.
    pub fn new(s: &str) -> Result<Self, NotePathError> {
        if s.is_empty() {
            return Err(NotePathError::Empty);
        }
        if s.starts_with('/') {
            return Err(NotePathError::Absolute(s.to_string()));
        }
        if s.ends_with('/') {
            return Err(NotePathError::TrailingSlash(s.to_string()));
        }
        if let Some(character) = s.chars().find(|c| *c == '\\' || c.is_control()) {
            return Err(NotePathError::ForbiddenCharacter {
                path: s.to_string(),
                character,
            });
        }
        for segment in s.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(NotePathError::InvalidSegment {
                    path: s.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        if s.split('/').next() == Some(ATTACHMENTS_ROOT) {
            return Err(NotePathError::Reserved(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Parses a path as it appears in a URL, ignoring a single leading slash.
    ///
    /// Front ends receive request paths like `/notes/today`; the store keys
    /// notes without the leading slash.
    pub fn from_url_path(s: &str) -> Result<Self, NotePathError> {
        Self::new(s.strip_prefix('/').unwrap_or(s))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the final segment of the path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for NotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotePath({:?})", self.0)
    }
}

impl FromStr for NotePath {
    type Err = NotePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NotePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NotePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_simple_and_nested_paths() {
        assert_eq!(NotePath::new("today").unwrap().as_str(), "today");
        assert_eq!(
            NotePath::new("work/2024/review.md").unwrap().as_str(),
            "work/2024/review.md"
        );
    }

    #[test]
    fn accepts_dotfiles_that_are_not_reserved() {
        assert!(NotePath::new(".drafts/idea").is_ok());
        assert!(NotePath::new("a/.files").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(NotePath::new(""), Err(NotePathError::Empty));
    }

    #[test]
    fn rejects_absolute() {
        assert!(matches!(
            NotePath::new("/etc/passwd"),
            Err(NotePathError::Absolute(_))
        ));
    }

    #[test]
    fn rejects_trailing_slash() {
        assert!(matches!(
            NotePath::new("notes/"),
            Err(NotePathError::TrailingSlash(_))
        ));
    }

    #[test]
    fn rejects_traversal_and_empty_segments() {
        for bad in ["..", ".", "a/../b", "a/./b", "a//b", "../a"] {
            assert!(
                matches!(
                    NotePath::new(bad),
                    Err(NotePathError::InvalidSegment { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_backslash_and_control_characters() {
        assert!(matches!(
            NotePath::new("a\\b"),
            Err(NotePathError::ForbiddenCharacter { character: '\\', .. })
        ));
        assert!(matches!(
            NotePath::new("a\0b"),
            Err(NotePathError::ForbiddenCharacter { .. })
        ));
        assert!(NotePath::new("line\nbreak").is_err());
    }

    #[test]
    fn rejects_attachment_namespace() {
        assert!(matches!(
            NotePath::new(".files/abc/photo.png"),
            Err(NotePathError::Reserved(_))
        ));
        assert!(matches!(
            NotePath::new(".files"),
            Err(NotePathError::Reserved(_))
        ));
    }

    #[test]
    fn from_url_path_strips_one_leading_slash() {
        assert_eq!(
            NotePath::from_url_path("/journal/monday").unwrap().as_str(),
            "journal/monday"
        );
        assert!(NotePath::from_url_path("/").is_err());
        assert!(NotePath::from_url_path("//x").is_err());
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(NotePath::new("a/b/c.md").unwrap().file_name(), "c.md");
        assert_eq!(NotePath::new("single").unwrap().file_name(), "single");
    }

    #[test]
    fn serde_rejects_invalid_on_deserialize() {
        let ok: NotePath = serde_json::from_str("\"a/b\"").unwrap();
        assert_eq!(ok.as_str(), "a/b");
        assert!(serde_json::from_str::<NotePath>("\"../x\"").is_err());
    }
}
