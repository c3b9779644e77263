//! Search command handler.

use anyhow::{Context, Result};

use super::StoreLocation;
use crate::cli::SearchArgs;
use crate::cli::output::{OutputFormat, SearchListing, print_json};
use crate::store::SearchHit;

pub fn handle_search(args: &SearchArgs, location: &StoreLocation) -> Result<()> {
    let store = location.open()?;
    let hits = store
        .search(&args.query)
        .with_context(|| format!("search failed for query: {}", args.query))?;

    format_search_output(&hits, args.format, args.html)
}

/// Format and print search results.
fn format_search_output(hits: &[SearchHit], format: OutputFormat, html: bool) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if hits.is_empty() {
                println!("No matching notes found.");
                return Ok(());
            }
            for hit in hits {
                println!("{}  {} (rank: {:.2})", hit.path, hit.title, hit.rank);
                let snippet = if html {
                    hit.snippet.to_html("<mark>", "</mark>")
                } else {
                    hit.snippet.plain()
                };
                if !snippet.is_empty() {
                    println!("  {}", snippet.replace('\n', " "));
                }
            }
            println!();
            println!("{} result(s)", hits.len());
        }
        OutputFormat::Json => {
            let listings: Vec<SearchListing> =
                hits.iter().map(|hit| SearchListing::new(hit, html)).collect();
            print_json(listings)?;
        }
        OutputFormat::Paths => {
            for hit in hits {
                println!("{}", hit.path);
            }
        }
    }
    Ok(())
}
