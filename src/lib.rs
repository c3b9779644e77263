//! quire - markdown notes, attachments and full-text search in one SQLite file

pub mod cli;
pub mod domain;
pub mod render;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        StoreLocation, handle_attach, handle_backup, handle_check, handle_fetch, handle_list,
        handle_reindex, handle_remove, handle_render, handle_save, handle_search, handle_show,
        handle_tagged,
    },
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(args) = &cli.command {
        clap_complete::generate(
            args.shell,
            &mut Cli::command(),
            "quire",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config = Config::load()?;
    let location = StoreLocation::new(config.db_path(cli.db.as_ref()), config.store_options());

    match &cli.command {
        Command::Save(args) => handle_save(args, &location),
        Command::Show(args) => handle_show(args, &location),
        Command::Render(args) => handle_render(args, &location),
        Command::List(args) => handle_list(args, &location),
        Command::Tagged(args) => handle_tagged(args, &location),
        Command::Search(args) => handle_search(args, &location),
        Command::Remove(args) => handle_remove(args, &location),
        Command::Attach(args) => handle_attach(args, &location),
        Command::Fetch(args) => handle_fetch(args, &location),
        Command::Check(args) => handle_check(args, &location),
        Command::Reindex => handle_reindex(&location),
        Command::Backup(args) => handle_backup(args, &location),
        Command::Completions(_) => Ok(()),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quire={default_level}")));

    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
