//! Markdown to HTML with heading anchors, table of contents and preview.

use super::slug::Slugger;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

/// Minimum number of anchored headings before a table of contents is shown.
pub const TOC_MIN_HEADINGS: usize = 2;

/// Minimum number of words in the source before a table of contents is shown.
pub const TOC_MIN_WORDS: usize = 300;

/// A heading that received an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub text: String,
    pub slug: String,
    pub level: u8,
}

/// Output of a single render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// HTML fragment with `id` attributes on anchored headings.
    pub html: String,
    /// Anchored headings in document order.
    pub headings: Vec<Heading>,
    /// Table of contents; empty for short documents.
    pub toc: Vec<Heading>,
    /// Whether the document contains a fenced or indented code block.
    pub has_code: bool,
    /// Plain text of the leading paragraph, or empty.
    pub preview: String,
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Renders note text.
///
/// Raw HTML passes through unchanged. Output depends only on `text`.
///
/// # Examples
///
/// ```
/// use quire::render::render;
///
/// let out = render("# Hello\n\nWorld");
/// assert!(out.html.contains(r#"<h1 id="hello">Hello</h1>"#));
/// assert_eq!(out.preview, "World");
/// assert!(out.toc.is_empty());
/// ```
pub fn render(text: &str) -> Rendered {
    let mut events: Vec<Event<'_>> = Parser::new_ext(text, options()).collect();

    let headings = assign_heading_ids(&mut events);
    let has_code = events
        .iter()
        .any(|event| matches!(event, Event::Start(Tag::CodeBlock(_))));
    let preview = first_paragraph_text(&events);
    let toc = if headings.len() >= TOC_MIN_HEADINGS && word_count_at_least(text, TOC_MIN_WORDS) {
        headings.clone()
    } else {
        Vec::new()
    };

    let mut html = String::with_capacity(text.len() + text.len() / 2);
    html::push_html(&mut html, events.into_iter());

    Rendered {
        html,
        headings,
        toc,
        has_code,
        preview,
    }
}

/// Gives every heading with sluggable text a unique `id`.
///
/// Headings without letters or digits, or whose numbered candidates are
/// exhausted, keep no id and are left out of the result.
pub fn assign_heading_ids(events: &mut [Event<'_>]) -> Vec<Heading> {
    let mut slugger = Slugger::new();
    let mut headings = Vec::new();
    let mut i = 0;

    while i < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level as u8;
        let start = i;
        let mut text = String::new();
        i += 1;
        while i < events.len() && !matches!(events[i], Event::End(TagEnd::Heading(_))) {
            match &events[i] {
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                _ => {}
            }
            i += 1;
        }

        if let Some(slug) = slugger.slug(&text) {
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                *id = Some(CowStr::from(slug.clone()));
            }
            headings.push(Heading { text, slug, level });
        }
    }

    headings
}

/// Returns the plain text of the document's first paragraph.
///
/// Only headings and HTML comment blocks may precede it; anything else at
/// the top level (lists, quotes, code, other HTML, rules, tables) yields an
/// empty string.
pub fn first_paragraph_text(events: &[Event<'_>]) -> String {
    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::Heading { .. }) => i = skip_block(events, i),
            Event::Start(Tag::HtmlBlock) => {
                let is_comment = matches!(
                    events.get(i + 1),
                    Some(Event::Html(html)) if html.trim_start().starts_with("<!--")
                );
                if !is_comment {
                    return String::new();
                }
                i = skip_block(events, i);
            }
            Event::Start(Tag::Paragraph) => return paragraph_text(&events[i + 1..]),
            _ => return String::new(),
        }
    }
    String::new()
}

/// Returns the index just past the `End` matching the `Start` at `start`.
fn skip_block(events: &[Event<'_>], start: usize) -> usize {
    let mut depth = 0usize;
    for (offset, event) in events[start..].iter().enumerate() {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }
    events.len()
}

fn paragraph_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Paragraph) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Returns `true` if `text` has at least `want` whitespace-separated words.
pub fn word_count_at_least(text: &str, want: usize) -> bool {
    text.split_whitespace().take(want).count() >= want
}
