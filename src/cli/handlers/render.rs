//! Render command handler.

use anyhow::{Result, bail};

use super::{StoreLocation, parse_note_path};
use crate::cli::RenderArgs;
use crate::cli::output::{OutputFormat, print_json};
use crate::render::render;

pub fn handle_render(args: &RenderArgs, location: &StoreLocation) -> Result<()> {
    let path = parse_note_path(&args.path)?;
    let store = location.open()?;
    let Some(note) = store.get(&path)? else {
        bail!("note not found: {path}");
    };
    let rendered = render(note.text());

    match args.format {
        OutputFormat::Human => print!("{}", rendered.html),
        OutputFormat::Json => print_json(&rendered)?,
        // One anchor per line, usable as `path#slug` links.
        OutputFormat::Paths => {
            for heading in &rendered.headings {
                println!("{}#{}", note.path(), heading.slug);
            }
        }
    }
    Ok(())
}
