//! Attachment command handlers.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::Write;

use super::{StoreLocation, parse_note_path};
use crate::cli::{AttachArgs, FetchArgs};
use crate::domain::is_stored_path;
use crate::store::CancelToken;

pub fn handle_attach(args: &AttachArgs, location: &StoreLocation) -> Result<()> {
    let owner = parse_note_path(&args.note)?;
    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", args.file.display()))?,
    };

    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("failed to stat {}", args.file.display()))?
        .len();

    let mut store = location.open()?;
    let stored = store
        .put_attachment_reader(&owner, &name, file, Some(size), &CancelToken::new())
        .with_context(|| format!("failed to attach {} to {owner}", args.file.display()))?;
    println!("{stored}");
    Ok(())
}

pub fn handle_fetch(args: &FetchArgs, location: &StoreLocation) -> Result<()> {
    if !is_stored_path(&args.path) {
        bail!(
            "invalid attachment path: {} (expected .files/<sha256>/<name>)",
            args.path
        );
    }
    let store = location.open()?;
    let Some(attachment) = store.get_attachment(&args.path)? else {
        bail!("attachment not found: {}", args.path);
    };

    match &args.output {
        Some(output) => std::fs::write(output, attachment.bytes())
            .with_context(|| format!("failed to write {}", output.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(attachment.bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write attachment to stdout")?;
        }
    }
    Ok(())
}
