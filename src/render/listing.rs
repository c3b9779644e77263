//! Tag grouping for note index pages.

use crate::domain::Note;
use serde::Serialize;
use std::collections::HashMap;

/// One row of an index page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingEntry<'a> {
    /// A note shown on its own.
    Note { note: &'a Note },
    /// Notes sharing the same first tag, most recent first.
    Group { tag: &'a str, notes: Vec<&'a Note> },
}

/// Groups notes by their first tag.
///
/// `notes` is expected in listing order (most recently modified first). A
/// first tag shared by two or more notes becomes one group, placed where its
/// most recent member would have been. Untagged notes and notes whose first
/// tag is unique are listed individually.
pub fn group_by_tag(notes: &[Note]) -> Vec<ListingEntry<'_>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for note in notes {
        if let Some(tag) = note.tags().first() {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut entries = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    for note in notes {
        let tag = note
            .tags()
            .first()
            .filter(|tag| counts.get(tag).copied().unwrap_or_default() > 1);
        let Some(tag) = tag else {
            entries.push(ListingEntry::Note { note });
            continue;
        };
        match group_index.get(tag) {
            Some(&index) => {
                if let ListingEntry::Group { notes, .. } = &mut entries[index] {
                    notes.push(note);
                }
            }
            None => {
                group_index.insert(tag, entries.len());
                entries.push(ListingEntry::Group {
                    tag,
                    notes: vec![note],
                });
            }
        }
    }
    entries
}
