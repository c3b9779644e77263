//! Note command handlers: save, show, ls, tagged, rm.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::io::Read;

use super::{StoreLocation, parse_note_path, truncate_str};
use crate::cli::output::{NoteListing, OutputFormat, print_json};
use crate::cli::{ListArgs, RemoveArgs, SaveArgs, ShowArgs, TaggedArgs};
use crate::domain::{AttachmentMeta, Note};
use crate::render::{ListingEntry, group_by_tag};

const TITLE_WIDTH: usize = 48;

pub fn handle_save(args: &SaveArgs, location: &StoreLocation) -> Result<()> {
    let path = parse_note_path(&args.path)?;
    let raw = match &args.file {
        Some(file) => std::fs::read(file)
            .with_context(|| format!("failed to read {}", file.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read note text from stdin")?;
            buf
        }
    };

    let mut store = location.open()?;
    let note = store
        .save(&path, &raw)
        .with_context(|| format!("failed to save {path}"))?;

    match args.format {
        OutputFormat::Human => println!("Saved {} ({})", note.path(), note.title()),
        OutputFormat::Json => print_json(NoteListing::from(&note))?,
        OutputFormat::Paths => println!("{}", note.path()),
    }
    Ok(())
}

pub fn handle_show(args: &ShowArgs, location: &StoreLocation) -> Result<()> {
    let path = parse_note_path(&args.path)?;
    let store = location.open()?;
    let Some(note) = store.get(&path)? else {
        bail!("note not found: {path}");
    };

    match args.format {
        OutputFormat::Human => println!("{}", note.text()),
        OutputFormat::Json => print_json(&note)?,
        OutputFormat::Paths => println!("{}", note.path()),
    }
    Ok(())
}

pub fn handle_list(args: &ListArgs, location: &StoreLocation) -> Result<()> {
    let store = location.open()?;
    let notes = store.list().context("failed to list notes")?;

    if args.group {
        let entries = group_by_tag(&notes);
        match args.format {
            OutputFormat::Human => print_grouped(&entries),
            OutputFormat::Json => print_json(&entries)?,
            OutputFormat::Paths => print_paths(&notes),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found.");
            }
            for note in &notes {
                println!("{}", human_line(note));
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(NoteListing::from).collect();
            print_json(listings)?;
        }
        OutputFormat::Paths => print_paths(&notes),
    }
    Ok(())
}

#[derive(Serialize)]
struct TaggedOutput {
    notes: Vec<NoteListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Vec<AttachmentMeta>>,
}

pub fn handle_tagged(args: &TaggedArgs, location: &StoreLocation) -> Result<()> {
    let store = location.open()?;
    let notes = store
        .list_tagged(&args.tag)
        .with_context(|| format!("failed to list notes tagged {}", args.tag))?;
    let attachments = if args.attachments {
        let files = store
            .attachments_tagged(&args.tag)
            .with_context(|| format!("failed to list attachments tagged {}", args.tag))?;
        Some(files.iter().map(|f| f.meta()).collect::<Vec<_>>())
    } else {
        None
    };

    match args.format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes tagged {}.", args.tag);
            }
            for note in &notes {
                println!("{}", human_line(note));
            }
            if let Some(files) = &attachments {
                println!();
                println!("{} attachment(s)", files.len());
                for file in files {
                    println!("  {}  {} bytes  ({})", file.path, file.size, file.note_path);
                }
            }
        }
        OutputFormat::Json => print_json(TaggedOutput {
            notes: notes.iter().map(NoteListing::from).collect(),
            attachments,
        })?,
        OutputFormat::Paths => {
            print_paths(&notes);
            for file in attachments.iter().flatten() {
                println!("{}", file.path);
            }
        }
    }
    Ok(())
}

pub fn handle_remove(args: &RemoveArgs, location: &StoreLocation) -> Result<()> {
    let path = parse_note_path(&args.path)?;
    let mut store = location.open()?;
    store
        .delete(&path)
        .with_context(|| format!("failed to delete {path}"))?;
    println!("Deleted {path}");
    Ok(())
}

fn human_line(note: &Note) -> String {
    let tags = if note.tags().is_empty() {
        String::new()
    } else {
        format!("  [{}]", note.tags().as_slice().join(", "))
    };
    format!(
        "{}  {:<width$}  {}{}",
        note.modified().format("%Y-%m-%d %H:%M"),
        truncate_str(note.title(), TITLE_WIDTH),
        note.path(),
        tags,
        width = TITLE_WIDTH
    )
}

fn print_paths(notes: &[Note]) {
    for note in notes {
        println!("{}", note.path());
    }
}

fn print_grouped(entries: &[ListingEntry<'_>]) {
    if entries.is_empty() {
        println!("No notes found.");
    }
    for entry in entries {
        match entry {
            ListingEntry::Note { note } => println!("{}", human_line(note)),
            ListingEntry::Group { tag, notes } => {
                println!("{tag} ({})", notes.len());
                for note in notes {
                    println!("  {}", human_line(note));
                }
            }
        }
    }
}
