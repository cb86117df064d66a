//! `lendlog` - CLI for the book-lending tracker
//!
//! Each subcommand opens the shelf, applies one change and exits. `shell`
//! keeps the shelf open for a whole session.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead};

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use lendlog::app::{AssumeYes, Confirm, StdinConfirm};
use lendlog::cli::{shell, Cli, Command, ConfigCommand, RemoveCommand, StatusCommand};
use lendlog::storage::SqliteSlots;
use lendlog::{
    init_logging, BookForm, BookStorage, Config, Intent, JsonRenderer, Library, Notifier, Outcome,
    Renderer, Shelf, SlotArchive, TextRenderer,
};

type Archive = SlotArchive<SqliteSlots>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Status messages hide themselves on a timer
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    let _guard = runtime.enter();

    match cli.command {
        Command::List(list_cmd) => {
            if list_cmd.json {
                open_library(&config, JsonRenderer::new(io::stdout()), AssumeYes)?.refresh()?;
            } else {
                open_library(&config, TextRenderer::new(io::stdout()), AssumeYes)?.refresh()?;
            }
        }
        Command::Add(add_cmd) => {
            let mut library = open_library(&config, TextRenderer::new(io::stdout()), AssumeYes)?;
            *library.form_mut() = BookForm::from(add_cmd);
            report(Intent::Submit, library.submit()?);
        }
        Command::Rent(book_cmd) => run_intent(&config, Intent::Rent(book_cmd.id))?,
        Command::Return(book_cmd) => run_intent(&config, Intent::Return(book_cmd.id))?,
        Command::Remove(remove_cmd) => handle_remove(&config, &remove_cmd)?,
        Command::Status(status_cmd) => handle_status(&config, &status_cmd)?,
        Command::Shell => {
            let mut library = open_library(&config, TextRenderer::new(io::stdout()), StdinConfirm)?;
            shell::run(
                &mut library,
                |buf| io::stdin().lock().read_line(buf),
                io::stdout(),
            )?;
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn open_archive(config: &Config) -> anyhow::Result<Archive> {
    let path = config.database_path();
    let slots = SqliteSlots::open(&path)
        .with_context(|| format!("failed to open shelf at {}", path.display()))?;
    Ok(SlotArchive::with_key(slots, config.storage.slot_key.clone()))
}

fn notifier(config: &Config) -> Notifier {
    Notifier::new(config.hide_after()).replacing_pending(config.notice.replace_pending)
}

fn open_library<R: Renderer, C: Confirm>(
    config: &Config,
    renderer: R,
    confirm: C,
) -> anyhow::Result<Library<Archive, R, C>> {
    let library = Library::open(open_archive(config)?, renderer, confirm, notifier(config))?;
    Ok(library)
}

fn run_intent(config: &Config, intent: Intent) -> anyhow::Result<()> {
    let mut library = open_library(config, TextRenderer::new(io::stdout()), AssumeYes)?;
    report(intent, library.dispatch(intent)?);
    Ok(())
}

fn handle_remove(config: &Config, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let confirm: Box<dyn Confirm> = if cmd.yes || !config.ui.confirm_removals {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };
    let mut library = open_library(config, TextRenderer::new(io::stdout()), confirm)?;
    let intent = Intent::Remove(cmd.id);
    report(intent, library.dispatch(intent)?);
    Ok(())
}

fn report(intent: Intent, outcome: Outcome) {
    match outcome {
        Outcome::Ignored => match intent {
            Intent::Rent(id) => warn!("Book {id} is not on the shelf or is already rented"),
            Intent::Return(id) => warn!("Book {id} is not on the shelf or is not rented"),
            Intent::Remove(id) => warn!("Book {id} is not on the shelf"),
            Intent::Submit => warn!("Nothing was added"),
        },
        Outcome::Declined => println!("Nothing removed."),
        Outcome::Changed | Outcome::Rejected => {}
    }
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let shelf = Shelf::from_books(open_archive(config)?.load()?);
    let counts = shelf.counts();
    let database_path = config.database_path();

    if cmd.json {
        let status = serde_json::json!({
            "books": shelf.len(),
            "available": counts.available,
            "rented": counts.rented,
            "database_path": database_path,
            "slot_key": config.storage.slot_key,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("lendlog status");
        println!("--------------");
        println!("Books:         {}", shelf.len());
        println!("Available:     {}", counts.available);
        println!("Rented:        {}", counts.rented);
        println!("Database:      {}", database_path.display());
        println!("Slot:          {}", config.storage.slot_key);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!();
                println!("[Notice]");
                println!("  Hide after (ms):    {}", config.notice.hide_after_ms);
                println!("  Replace pending:    {}", config.notice.replace_pending);
                println!();
                println!("[UI]");
                println!("  Confirm removals:   {}", config.ui.confirm_removals);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
