//! Maintenance command handlers: check, reindex, backup.

use anyhow::{Context, Result, bail};

use super::StoreLocation;
use crate::cli::output::{OutputFormat, print_json};
use crate::cli::{BackupArgs, CheckArgs};

pub fn handle_check(args: &CheckArgs, location: &StoreLocation) -> Result<()> {
    let store = location.open()?;
    let report = store
        .check_search_index()
        .context("failed to check search index")?;
    let problems = report.missing.len() + report.orphaned.len() + report.stale.len();

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Paths => {
            for path in report.missing.iter().chain(&report.orphaned).chain(&report.stale) {
                println!("{path}");
            }
        }
        OutputFormat::Human => {
            if report.is_clean() {
                println!("Search index OK ({} notes).", store.count()?);
                return Ok(());
            }
            for path in &report.missing {
                println!("missing: {path}");
            }
            for path in &report.orphaned {
                println!("orphaned: {path}");
            }
            for path in &report.stale {
                println!("stale: {path}");
            }
        }
    }

    if problems > 0 {
        bail!("search index has {problems} problem(s); run `quire reindex`");
    }
    Ok(())
}

pub fn handle_reindex(location: &StoreLocation) -> Result<()> {
    let mut store = location.open()?;
    let written = store
        .rebuild_search_index()
        .context("failed to rebuild search index")?;
    println!("Reindexed {written} notes");
    Ok(())
}

pub fn handle_backup(args: &BackupArgs, location: &StoreLocation) -> Result<()> {
    let store = location.open()?;
    store
        .backup_to(&args.dest)
        .with_context(|| format!("failed to write backup to {}", args.dest.display()))?;
    println!("Backup written to {}", args.dest.display());
    Ok(())
}
