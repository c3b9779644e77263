//! Builder for test note text.

#![allow(dead_code)]

/// Builds markdown note text with an optional tag directive.
#[derive(Debug, Clone)]
pub struct TestNote {
    path: String,
    title: String,
    tags: Vec<String>,
    body: String,
}

impl TestNote {
    /// A note at `path` whose first line is `# {title}`.
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            tags: Vec::new(),
            body: String::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Renders the note as it would be saved.
    pub fn to_markdown(&self) -> String {
        let mut text = format!("# {}\n", self.title);
        if !self.tags.is_empty() {
            text.push_str(&format!("<!-- Tags: {} -->\n", self.tags.join(", ")));
        }
        if !self.body.is_empty() {
            text.push('\n');
            text.push_str(&self.body);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_markdown_with_tags() {
        let note = TestNote::new("a/b", "Title").tag("x").tag("y").body("Body.");
        assert_eq!(
            note.to_markdown(),
            "# Title\n<!-- Tags: x, y -->\n\nBody.\n"
        );
    }

    #[test]
    fn test_note_markdown_without_tags() {
        assert_eq!(TestNote::new("a", "Only").to_markdown(), "# Only\n");
    }
}
