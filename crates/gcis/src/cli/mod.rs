//! Command-line interface for gcis.
//!
//! This module provides the CLI structure for the `gcis` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnnotationsCommand, ClearanceCommand, ConfigCommand, FileRecordCommand, OutputFormat,
    PassphraseCommand, ProjectsCommand, RecordsCommand, RegisterProjectCommand, VisibilityCommand,
};

/// gcis - Browse the clearance-gated records archive
///
/// Reads the records and projects directories, tracks the local clearance
/// profile, and captures filed records and registered projects as JSON.
#[derive(Debug, Parser)]
#[command(name = "gcis")]
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
    /// Inspect or change the clearance profile
    #[command(subcommand)]
    Clearance(ClearanceCommand),

    /// Submit a passphrase on the access page
    Passphrase(PassphraseCommand),

    /// Browse records
    #[command(subcommand)]
    Records(RecordsCommand),

    /// Browse projects
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// File a record and export it as JSON
    FileRecord(FileRecordCommand),

    /// Register a project and export it as JSON
    RegisterProject(RegisterProjectCommand),

    /// Read or add record annotations
    #[command(subcommand)]
    Annotations(AnnotationsCommand),

    /// Show what a page displays at the current clearance
    Visibility(VisibilityCommand),

    /// View or validate configuration
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
    use crate::visibility::Page;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Clearance(ClearanceCommand::Show),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "gcis");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_clearance_set() {
        let cli = Cli::try_parse_from(["gcis", "clearance", "set", "witness"]).unwrap();
        let Command::Clearance(ClearanceCommand::Set { level }) = cli.command else {
            panic!("expected clearance set");
        };
        assert_eq!(level, "witness");
    }

    #[test]
    fn test_parse_admin_revoke() {
        let cli = Cli::try_parse_from(["gcis", "clearance", "admin", "--revoke"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Clearance(ClearanceCommand::Admin { revoke: true })
        ));
    }

    #[test]
    fn test_parse_records_show_read() {
        let cli = Cli::try_parse_from(["gcis", "records", "show", "GC-R-000", "--read"]).unwrap();
        let Command::Records(RecordsCommand::Show { id, read, format }) = cli.command else {
            panic!("expected records show");
        };
        assert_eq!(id, "GC-R-000");
        assert!(read);
        assert_eq!(format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_file_record() {
        let cli = Cli::try_parse_from([
            "gcis",
            "file-record",
            "--id",
            "GC-R-014",
            "--source-ref",
            "tape 4",
        ])
        .unwrap();
        let Command::FileRecord(cmd) = cli.command else {
            panic!("expected file-record");
        };
        assert_eq!(cmd.id.as_deref(), Some("GC-R-014"));
        assert_eq!(cmd.source_ref.as_deref(), Some("tape 4"));
        assert_eq!(cmd.archival_state, "active");
    }

    #[test]
    fn test_parse_visibility_page() {
        let cli = Cli::try_parse_from(["gcis", "visibility", "--page", "access"]).unwrap();
        let Command::Visibility(cmd) = cli.command else {
            panic!("expected visibility");
        };
        assert_eq!(cmd.page, Page::Access);

        let cli = Cli::try_parse_from(["gcis", "visibility"]).unwrap();
        let Command::Visibility(cmd) = cli.command else {
            panic!("expected visibility");
        };
        assert_eq!(cmd.page, Page::System);

        assert!(Cli::try_parse_from(["gcis", "visibility", "--page", "lobby"]).is_err());
    }

    #[test]
    fn test_parse_annotations_add() {
        let cli = Cli::try_parse_from(["gcis", "annotations", "add", "GC-R-001", "seen"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Annotations(AnnotationsCommand::Add { .. })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["gcis", "-c", "/custom/config.toml", "config", "path"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["gcis", "-v", "clearance", "show"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let cli = Cli::try_parse_from(["gcis", "-q", "clearance", "show"]).unwrap();
        assert!(cli.quiet);
    }
}
