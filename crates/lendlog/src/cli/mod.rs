//! Command-line interface for lendlog.
//!
//! This module provides the CLI structure for the `lendlog` binary and the
//! interactive shell it can run.

mod commands;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, BookCommand, ConfigCommand, ListCommand, RemoveCommand, StatusCommand,
};

/// lendlog - Keep track of the books you lend out
///
/// Add books to your shelf, mark them rented and returned, and remove them.
/// The shelf is saved after every change.
#[derive(Debug, Parser)]
#[command(name = "lendlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every book on the shelf
    List(ListCommand),

    /// Add a book
    Add(AddCommand),

    /// Mark an available book as rented
    Rent(BookCommand),

    /// Mark a rented book as available again
    Return(BookCommand),

    /// Remove a book from the shelf
    Remove(RemoveCommand),

    /// Show shelf totals and where the shelf is stored
    Status(StatusCommand),

    /// Start an interactive session
    Shell,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Shell,
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "lendlog");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["lendlog", "add", "Dune", "Frank Herbert", "1965"]).unwrap();
        let Command::Add(cmd) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(cmd.title, "Dune");
        assert_eq!(cmd.author, "Frank Herbert");
        assert_eq!(cmd.year, "1965");
    }

    #[test]
    fn test_parse_add_requires_all_fields() {
        assert!(Cli::try_parse_from(["lendlog", "add", "Dune"]).is_err());
    }

    #[test]
    fn test_parse_rent_and_return() {
        let cli = Cli::try_parse_from(["lendlog", "rent", "1700000000000"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Rent(BookCommand { id: 1_700_000_000_000 })
        ));

        let cli = Cli::try_parse_from(["lendlog", "return", "5"]).unwrap();
        assert!(matches!(cli.command, Command::Return(BookCommand { id: 5 })));
    }

    #[test]
    fn test_parse_rent_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["lendlog", "rent", "dune"]).is_err());
    }

    #[test]
    fn test_parse_remove_with_yes() {
        let cli = Cli::try_parse_from(["lendlog", "remove", "5", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Remove(RemoveCommand { id: 5, yes: true })
        ));
    }

    #[test]
    fn test_parse_list_json() {
        let cli = Cli::try_parse_from(["lendlog", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::List(ListCommand { json: true })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["lendlog", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["lendlog", "config", "validate", "-f", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
