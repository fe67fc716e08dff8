//! CLI argument parsing for the clergy-import binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::LayoutKind;

#[derive(Parser)]
#[command(name = "clergy-import", about = "Clergy registry spreadsheet import")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a registry spreadsheet (.csv, .xlsx, .xlsm, .xls, .ods)
    Import {
        file: PathBuf,
        /// Column layout (defaults to IMPORT_LAYOUT, then odessa)
        #[arg(long, value_enum)]
        layout: Option<LayoutKind>,
        /// Overwrite records that already exist instead of rejecting the row
        #[arg(long)]
        update_existing: bool,
        /// Import into an empty in-memory registry; the database is not touched
        #[arg(long)]
        dry_run: bool,
        /// Print the result as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Merge phone numbers from a clergy contact list
    Phones {
        file: PathBuf,
        /// Match and report without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Search the registry by "name surname"
    Find { query: String },
    /// Print registry statistics
    Stats,
    /// Run database migrations and exit
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_import_defaults() {
        let cli = Cli::parse_from(["clergy-import", "import", "registry.xlsx"]);
        match cli.command {
            Command::Import {
                file,
                layout,
                update_existing,
                dry_run,
                json,
            } => {
                assert_eq!(file, PathBuf::from("registry.xlsx"));
                assert!(layout.is_none());
                assert!(!update_existing);
                assert!(!dry_run);
                assert!(!json);
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_cli_import_flags() {
        let cli = Cli::parse_from([
            "clergy-import",
            "import",
            "list.csv",
            "--layout",
            "flat",
            "--update-existing",
            "--dry-run",
            "--json",
        ]);
        assert!(matches!(
            cli.command,
            Command::Import {
                layout: Some(LayoutKind::Flat),
                update_existing: true,
                dry_run: true,
                json: true,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_layout() {
        let result = Cli::try_parse_from(["clergy-import", "import", "a.xlsx", "--layout", "word"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_phones_command_parses() {
        let cli = Cli::parse_from(["clergy-import", "phones", "kliriki.xlsx", "--dry-run"]);
        assert!(matches!(cli.command, Command::Phones { dry_run: true, .. }));
    }

    #[test]
    fn test_cli_find_stats_and_migrate_parse() {
        let cli = Cli::parse_from(["clergy-import", "find", "Петр Иванов"]);
        assert!(matches!(cli.command, Command::Find { ref query } if query == "Петр Иванов"));

        let cli = Cli::parse_from(["clergy-import", "stats"]);
        assert!(matches!(cli.command, Command::Stats));

        let cli = Cli::parse_from(["clergy-import", "migrate"]);
        assert!(matches!(cli.command, Command::Migrate));
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["clergy-import"]).is_err());
    }
}
