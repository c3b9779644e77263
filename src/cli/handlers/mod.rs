//! Command handlers for the CLI.

mod attachments;
mod maintenance;
mod notes;
mod render;
mod search;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::NotePath;
use crate::store::{NoteStore, StoreOptions};

// Re-export public items
pub use attachments::{handle_attach, handle_fetch};
pub use maintenance::{handle_backup, handle_check, handle_reindex};
pub use notes::{handle_list, handle_remove, handle_save, handle_show, handle_tagged};
pub use render::handle_render;
pub use search::handle_search;

// ===========================================
// Shared Utilities
// ===========================================

/// The database a command operates on.
#[derive(Debug, Clone)]
pub struct StoreLocation {
    pub db: PathBuf,
    pub options: StoreOptions,
}

impl StoreLocation {
    pub fn new(db: PathBuf, options: StoreOptions) -> Self {
        Self { db, options }
    }

    /// Opens the store, creating the database file if needed.
    pub fn open(&self) -> Result<NoteStore> {
        NoteStore::open_with(&self.db, self.options.clone())
            .with_context(|| format!("failed to open database at {}", self.db.display()))
    }
}

/// Parses a note path argument; a single leading `/` is accepted.
pub(crate) fn parse_note_path(raw: &str) -> Result<NotePath> {
    NotePath::from_url_path(raw).with_context(|| format!("invalid note path: {raw}"))
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
