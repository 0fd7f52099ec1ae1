//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::visibility::Page;

/// Clearance profile commands.
#[derive(Debug, Subcommand)]
pub enum ClearanceCommand {
    /// Show the current clearance level and admin flag
    Show,

    /// Set the clearance level (unknown names are ignored)
    Set {
        /// Level name: public, registered, witness, authorized, restricted
        level: String,
    },

    /// Set or clear the admin override
    Admin {
        /// Clear the flag instead of setting it
        #[arg(long)]
        revoke: bool,
    },
}

/// Passphrase submission arguments.
#[derive(Debug, Args)]
pub struct PassphraseCommand {
    /// The passphrase as typed
    pub value: String,
}

/// Records directory commands.
#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List records, charter first
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a record page
    Show {
        /// Record id
        id: String,

        /// Stay on the page and read the charter to the end
        #[arg(long)]
        read: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Open a record from the index
    Open {
        /// Record id
        id: String,
    },
}

/// Projects directory commands.
#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a project page with its linked records
    Show {
        /// Project id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },
}

/// Record filing form values.
#[derive(Debug, Default, Args)]
pub struct FileRecordCommand {
    /// Record id
    #[arg(long)]
    pub id: Option<String>,
    /// Title
    #[arg(long)]
    pub title: Option<String>,
    /// Division
    #[arg(long)]
    pub division: Option<String>,
    /// Medium
    #[arg(long)]
    pub medium: Option<String>,
    /// Year
    #[arg(long)]
    pub year: Option<String>,
    /// Status
    #[arg(long)]
    pub status: Option<String>,
    /// Authors, comma separated
    #[arg(long)]
    pub author: Option<String>,
    /// Origin
    #[arg(long)]
    pub origin: Option<String>,
    /// Source reference
    #[arg(long)]
    pub source_ref: Option<String>,
    /// Creation date
    #[arg(long)]
    pub date_created: Option<String>,
    /// Publication date
    #[arg(long)]
    pub date_published: Option<String>,
    /// Tags, comma separated
    #[arg(long)]
    pub tags: Option<String>,
    /// Sensitivity level
    #[arg(long)]
    pub sensitivity_level: Option<String>,
    /// Sensitivity note
    #[arg(long)]
    pub sensitivity_note: Option<String>,
    /// Context
    #[arg(long)]
    pub context: Option<String>,
    /// Project ids, comma separated
    #[arg(long)]
    pub project: Option<String>,
    /// Archival state
    #[arg(long, default_value = "active")]
    pub archival_state: String,
    /// Archival note (kept only for archived or decayed records)
    #[arg(long)]
    pub archival_note: Option<String>,
}

impl FileRecordCommand {
    /// Form field keys paired with the values given on the command line.
    ///
    /// The archival state comes first so the note is not cleared after it
    /// is entered.
    #[must_use]
    pub fn field_values(&self) -> Vec<(&'static str, &str)> {
        let optional = [
            ("id", &self.id),
            ("title", &self.title),
            ("division", &self.division),
            ("medium", &self.medium),
            ("year", &self.year),
            ("status", &self.status),
            ("author", &self.author),
            ("origin", &self.origin),
            ("sourceRef", &self.source_ref),
            ("dateCreated", &self.date_created),
            ("datePublished", &self.date_published),
            ("tags", &self.tags),
            ("sensitivityLevel", &self.sensitivity_level),
            ("sensitivityNote", &self.sensitivity_note),
            ("context", &self.context),
            ("project", &self.project),
            ("archivalNote", &self.archival_note),
        ];
        std::iter::once(("archivalState", self.archival_state.as_str()))
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(key, value)| value.as_deref().map(|value| (key, value))),
            )
            .collect()
    }
}

/// Project registration form values.
#[derive(Debug, Default, Args)]
pub struct RegisterProjectCommand {
    /// Project id
    #[arg(long)]
    pub id: Option<String>,
    /// Name
    #[arg(long)]
    pub name: Option<String>,
    /// Status
    #[arg(long)]
    pub status: Option<String>,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// Lead
    #[arg(long)]
    pub lead: Option<String>,
    /// Scope
    #[arg(long)]
    pub scope: Option<String>,
    /// First year
    #[arg(long)]
    pub start_year: Option<String>,
    /// Last year
    #[arg(long)]
    pub end_year: Option<String>,
}

impl RegisterProjectCommand {
    /// Form field keys paired with the values given on the command line.
    #[must_use]
    pub fn field_values(&self) -> Vec<(&'static str, &str)> {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("status", &self.status),
            ("description", &self.description),
            ("lead", &self.lead),
            ("scope", &self.scope),
            ("startYear", &self.start_year),
            ("endYear", &self.end_year),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
        .collect()
    }
}

/// Annotation commands.
#[derive(Debug, Subcommand)]
pub enum AnnotationsCommand {
    /// List annotations on a record
    List {
        /// Record id
        record: String,
    },

    /// Add an annotation to a record
    Add {
        /// Record id
        record: String,
        /// Annotation text
        text: String,
    },
}

/// Visibility command arguments.
#[derive(Debug, Args)]
pub struct VisibilityCommand {
    /// Page to evaluate (name such as `access`, or a path ending in `access.html`)
    #[arg(short, long, default_value = "system")]
    pub page: Page,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_file_record_values_skip_absent() {
        let cmd = FileRecordCommand {
            id: Some("GC-R-014".to_string()),
            source_ref: Some("tape 4".to_string()),
            archival_state: "archived".to_string(),
            archival_note: Some("cold storage".to_string()),
            ..FileRecordCommand::default()
        };
        assert_eq!(
            cmd.field_values(),
            vec![
                ("archivalState", "archived"),
                ("id", "GC-R-014"),
                ("sourceRef", "tape 4"),
                ("archivalNote", "cold storage"),
            ]
        );
    }

    #[test]
    fn test_register_project_values() {
        let cmd = RegisterProjectCommand {
            id: Some("p1".to_string()),
            start_year: Some("2030".to_string()),
            ..RegisterProjectCommand::default()
        };
        assert_eq!(cmd.field_values(), vec![("id", "p1"), ("startYear", "2030")]);
    }

    #[test]
    fn test_clearance_command_debug() {
        let cmd = ClearanceCommand::Admin { revoke: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Admin"));
        assert!(debug_str.contains("revoke"));
    }
}
