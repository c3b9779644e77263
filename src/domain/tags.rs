//! Note tags and the `<!-- Tags: ... -->` directive.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Keyword that marks a tag directive inside an HTML comment.
pub const TAGS_KEYWORD: &str = "Tags:";

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("comment pattern is valid"));

/// An ordered, de-duplicated list of non-empty tags.
///
/// Entries are trimmed, empty entries are dropped, and only the first
/// occurrence of a repeated tag is kept. Tags are case-sensitive.
///
/// # Examples
///
/// ```
/// use quire::domain::Tags;
///
/// let tags = Tags::new([" rust", "", "cli", "rust "]);
/// assert_eq!(tags.as_slice(), ["rust", "cli"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Normalizes an arbitrary sequence of tag strings.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() || !seen.insert(tag.to_string()) {
                continue;
            }
            out.push(tag.to_string());
        }
        Self(out)
    }

    /// Returns an empty tag list.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `tag` is one of the tags (exact match).
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Returns the first tag, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

/// Extracts tags from the first HTML comment carrying a `Tags:` directive.
///
/// The list runs from the keyword to the end of that line, separated by
/// commas. Missing or malformed directives produce an empty list; this
/// function never fails.
///
/// Comments without the keyword are skipped rather than ending the scan, so
/// a directive after an unrelated comment (or after a stray `-->`) is still
/// found.
///
/// # Examples
///
/// ```
/// use quire::domain::extract_tags;
///
/// let tags = extract_tags("# Title\n<!-- Tags: tag2,tag1, tag2, tag3, -->\n");
/// assert_eq!(tags.as_slice(), ["tag2", "tag1", "tag3"]);
///
/// assert!(extract_tags("no directive here").is_empty());
/// ```
pub fn extract_tags(text: &str) -> Tags {
    for comment in COMMENT.captures_iter(text) {
        let Some(body) = comment.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let Some(start) = body.find(TAGS_KEYWORD) else {
            continue;
        };
        let rest = &body[start + TAGS_KEYWORD.len()..];
        let line = rest.split('\n').next().unwrap_or_default();
        return Tags::new(line.split(','));
    }
    Tags::empty()
}
