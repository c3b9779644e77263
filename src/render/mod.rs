//! Markdown rendering: HTML output, heading anchors, previews and index grouping

pub mod listing;
mod markdown;
mod slug;

pub use listing::{ListingEntry, group_by_tag};
pub use markdown::{
    Heading, Rendered, TOC_MIN_HEADINGS, TOC_MIN_WORDS, assign_heading_ids, first_paragraph_text,
    render, word_count_at_least,
};
pub use slug::{MAX_SLUG_ATTEMPTS, Slugger, slugify};

/// Appends `text` to `out`, escaped for HTML element content or quoted
/// attributes.
pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
