//! Heading anchors.

use std::collections::HashSet;

/// Number of candidates tried for a colliding slug (`slug`, `slug-1`, …,
/// `slug-99`) before the heading is left without an anchor.
pub const MAX_SLUG_ATTEMPTS: usize = 100;

/// Converts heading text to an anchor slug.
///
/// Letters and digits are lowercased (Unicode-aware). Every run of other
/// characters after the first letter or digit becomes a single hyphen, and
/// trailing hyphens are trimmed. Text with no letters or digits yields an
/// empty string.
///
/// # Examples
///
/// ```
/// use quire::render::slugify;
///
/// assert_eq!(slugify("Hello, world"), "hello-world");
/// assert_eq!(slugify("- leading dash"), "leading-dash");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() {
            pending_dash = true;
        }
    }
    slug
}

/// Hands out unique slugs within one document.
///
/// Each render owns its own `Slugger`, so anchors depend only on the
/// headings of that document and their order.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slug for `text` not handed out before by this slugger.
    ///
    /// `None` when the text has no letters or digits, or when every
    /// numbered candidate is already taken.
    pub fn slug(&mut self, text: &str) -> Option<String> {
        let base = slugify(text);
        if base.is_empty() {
            return None;
        }
        (0..MAX_SLUG_ATTEMPTS)
            .map(|i| {
                if i == 0 {
                    base.clone()
                } else {
                    format!("{base}-{i}")
                }
            })
            .find(|candidate| self.seen.insert(candidate.clone()))
    }
}
