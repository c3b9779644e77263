//! Output format types for CLI commands.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Note;
use crate::store::SearchHit;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Plain note or attachment paths, one per line
    Paths,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl From<&Note> for NoteListing {
    fn from(note: &Note) -> Self {
        Self {
            path: note.path().to_string(),
            title: note.title().to_string(),
            tags: note.tags().as_slice().to_vec(),
            created: note.created(),
            modified: note.modified(),
        }
    }
}

/// A search result in JSON output.
#[derive(Debug, Serialize)]
pub struct SearchListing {
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub rank: f64,
    pub snippet: String,
}

impl SearchListing {
    pub fn new(hit: &SearchHit, html: bool) -> Self {
        Self {
            path: hit.path.to_string(),
            title: hit.title.clone(),
            tags: hit.tags.as_slice().to_vec(),
            rank: hit.rank,
            snippet: if html {
                hit.snippet.to_html("<mark>", "</mark>")
            } else {
                hit.snippet.plain()
            },
        }
    }
}

/// Prints `value` as pretty JSON wrapped in `{"data": …}`.
pub fn print_json<T: Serialize>(value: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&Output::new(value))?);
    Ok(())
}
