use clap::Parser;
use jotter::api::{ConfigAction, JotApi};
use jotter::error::Result;
use jotter::init::{initialize, resolve_home};
use jotter::store::fs::FsBackend;
use tracing_subscriber::EnvFilter;

mod args;
mod print;
use args::{parse_target, split_book, Cli, Commands};
use print::{print_books, print_config, print_messages, print_notes};

/// Filter for diagnostic output, e.g. `JOTTER_LOG=jotter=debug`.
const LOG_ENV: &str = "JOTTER_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let home = resolve_home(cli.home.clone())?;
    let mut ctx = initialize(home)?;

    // Every invocation upgrades first; commands only understand the latest
    // layout.
    let migrated = ctx.api.migrate()?;
    let upgraded = migrated.report.as_ref().is_some_and(|r| !r.is_noop());
    if upgraded || matches!(cli.command, Some(Commands::Migrate)) {
        print_messages(&migrated.messages);
    }
    let api = &mut ctx.api;

    match cli.command {
        Some(Commands::Migrate) => Ok(()),
        Some(Commands::Books) | None => handle_books(api),
        Some(Commands::View { book }) => handle_view(api, book),
        Some(Commands::Add { args }) => {
            let (book, content) = split_book(&args);
            let result = api.add(book, content)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Edit { target, content }) => {
            let (book, index) = parse_target(&target)?;
            let result = api.edit(book, index, &content)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Remove { target }) => {
            let (book, index) = parse_target(&target)?;
            let result = api.remove(book, index)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Find { query, book }) => handle_find(api, query, book),
        Some(Commands::Config { key, value }) => handle_config(api, key, value),
    }
}

fn handle_config(
    api: &mut JotApi<FsBackend>,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let result = api.configure(action)?;
    if let (Some(config), true) = (&result.config, result.messages.is_empty()) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_books(api: &JotApi<FsBackend>) -> Result<()> {
    let result = api.books()?;
    print_books(&result.books);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(api: &JotApi<FsBackend>, book: Option<String>) -> Result<()> {
    let result = api.view(book.as_deref())?;
    if result.listed_notes.is_empty() {
        println!("No notes in this book.");
    }
    print_notes(&result.listed_notes, false);
    print_messages(&result.messages);
    Ok(())
}

fn handle_find(api: &JotApi<FsBackend>, query: String, book: Option<String>) -> Result<()> {
    let result = api.find(&query, book.as_deref())?;
    print_notes(&result.listed_notes, true);
    print_messages(&result.messages);
    Ok(())
}
