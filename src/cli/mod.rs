//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// quire - markdown notes in a single SQLite file
#[derive(Parser, Debug)]
#[command(name = "quire", version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or replace a note from a file or stdin
    Save(SaveArgs),

    /// Show a note's text
    Show(ShowArgs),

    /// Render a note to HTML
    Render(RenderArgs),

    /// List notes, most recently modified first
    #[command(name = "ls")]
    List(ListArgs),

    /// List notes and attachments carrying a tag
    Tagged(TaggedArgs),

    /// Full-text search across notes
    Search(SearchArgs),

    /// Delete a note and its attachments
    #[command(name = "rm")]
    Remove(RemoveArgs),

    /// Attach a file to a note
    Attach(AttachArgs),

    /// Write an attachment's bytes to stdout or a file
    Fetch(FetchArgs),

    /// Compare notes with the search index
    Check(CheckArgs),

    /// Rebuild the search index from stored notes
    Reindex,

    /// Write a consistent snapshot of the database
    Backup(BackupArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `save` command
#[derive(Parser, Debug)]
pub struct SaveArgs {
    /// Note path (e.g. `journal/2024-05-01`)
    pub path: String,

    /// Read note text from this file instead of stdin
    #[arg(short = 'i', long = "file")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note path
    pub path: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `render` command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Note path
    pub path: String,

    /// Output format (human prints the HTML fragment)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Group notes sharing their first tag
    #[arg(short, long)]
    pub group: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tagged` command
#[derive(Parser, Debug)]
pub struct TaggedArgs {
    /// Tag to scan for (exact, case-sensitive)
    pub tag: String,

    /// Also list attachments of the tagged notes
    #[arg(short, long)]
    pub attachments: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// FTS5 match expression
    pub query: String,

    /// Print snippets as HTML with `<mark>` around matches
    #[arg(long)]
    pub html: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Note path
    pub path: String,
}

/// Arguments for the `attach` command
#[derive(Parser, Debug)]
pub struct AttachArgs {
    /// Path of the owning note
    pub note: String,

    /// File to upload
    pub file: PathBuf,

    /// Store under this name instead of the file's own name
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for the `fetch` command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Stored attachment path (`.files/<digest>/<name>`)
    pub path: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `check` command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `backup` command
#[derive(Parser, Debug)]
pub struct BackupArgs {
    /// Destination file for the snapshot
    pub dest: PathBuf,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
