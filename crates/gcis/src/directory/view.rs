//! Presentation models for the record and project pages.
//!
//! Views are plain data: what each slot of a page shows. The CLI prints
//! them, but any front end can render them.

use serde::Serialize;

use crate::clearance::{restricted_notice, ClearanceLevel};

use super::model::{ArchivalState, Choice, Project, Record, Status};
use super::{Directory, CHARTER_ID};

/// Shown in place of non-charter public content.
pub const PUBLIC_PLACEHOLDER: &str = "Content pending publication.";

/// Shown for an unknown record id.
pub const MISSING_RECORD: &str = "Record unavailable.";

/// Shown for an unknown project id.
pub const MISSING_PROJECT: &str = "Project unavailable.";

/// Archival note for archived records.
pub const ARCHIVED_NOTICE: &str = "Archived for reference.";

/// Status line for decayed records.
pub const DECAY_NOTICE: &str = "This record is no longer available.";

/// Visual marker derived from a record's archival state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMarker {
    /// No marker.
    None,
    /// "Archived" indicator next to the status.
    Archived,
    /// Row is drawn as decayed.
    Decayed,
}

impl From<ArchivalState> for RowMarker {
    fn from(state: ArchivalState) -> Self {
        match state {
            ArchivalState::Active => Self::None,
            ArchivalState::Archived => Self::Archived,
            ArchivalState::Decayed => Self::Decayed,
        }
    }
}

/// What opening a row does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Go to the record page.
    Navigate(String),
    /// Stay put and show a notice.
    Notice(&'static str),
}

/// One row of a record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    /// Record id.
    pub id: String,
    /// Record title.
    pub title: String,
    /// Link to the record page.
    pub href: String,
    /// Division label.
    pub division: &'static str,
    /// Year.
    pub year: i32,
    /// Raw status.
    pub status: Status,
    /// Status label.
    pub status_label: &'static str,
    /// Archival marker.
    pub marker: RowMarker,
}

impl RecordRow {
    /// Build the row for a record.
    #[must_use]
    pub fn new(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            href: record_href(&record.id),
            division: record.division.label(),
            year: record.year,
            status: record.status,
            status_label: record.status.label(),
            marker: record.archival_state().into(),
        }
    }

    /// Open the row. Restricted rows never navigate.
    #[must_use]
    pub fn open(&self, level: ClearanceLevel) -> RowAction {
        if self.status == Status::Restricted {
            RowAction::Notice(restricted_notice(level))
        } else {
            RowAction::Navigate(self.href.clone())
        }
    }
}

/// Rows for the records index, charter first.
#[must_use]
pub fn records_table(directory: &Directory) -> Vec<RecordRow> {
    directory
        .list_records()
        .iter()
        .map(|record| RecordRow::new(record))
        .collect()
}

/// Labelled fields of a record page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFields {
    /// Id.
    pub id: String,
    /// Division label.
    pub division: &'static str,
    /// Medium label.
    pub medium: &'static str,
    /// Year.
    pub year: String,
    /// Status label.
    pub status: &'static str,
}

/// A rendered record page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPage {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Field list.
    pub fields: RecordFields,
    /// Archival term and note, shown for archived records only.
    pub archival: Option<(&'static str, &'static str)>,
    /// Status line above the content. Empty when content is shown.
    pub status_line: String,
    /// Content body. Empty when withheld.
    pub content: String,
    /// The charter text is on screen; reading it can upgrade clearance.
    pub charter_text_shown: bool,
}

/// Record detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum RecordView {
    /// Unknown id.
    Unavailable,
    /// Known record.
    Page(RecordPage),
}

impl RecordView {
    /// Render the detail view for `id` at `level`.
    #[must_use]
    pub fn render(directory: &Directory, id: Option<&str>, level: ClearanceLevel) -> Self {
        match id.and_then(|id| directory.find_record(id)) {
            Some(record) => Self::Page(RecordPage::new(&record, level)),
            None => Self::Unavailable,
        }
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Unavailable => MISSING_RECORD,
            Self::Page(page) => &page.title,
        }
    }
}

impl RecordPage {
    /// Render a known record at `level`.
    #[must_use]
    pub fn new(record: &Record, level: ClearanceLevel) -> Self {
        let state = record.archival_state();
        let fields = RecordFields {
            id: record.id.clone(),
            division: record.division.label(),
            medium: record.medium.label(),
            year: record.year.to_string(),
            status: record.status.label(),
        };
        let archival = (state == ArchivalState::Archived).then_some(("Archival", ARCHIVED_NOTICE));

        let charter_text = record
            .content
            .as_deref()
            .filter(|_| record.id == CHARTER_ID)
            .filter(|content| !content.is_empty());

        let (status_line, content, charter_text_shown) = if state == ArchivalState::Decayed {
            (DECAY_NOTICE.to_string(), String::new(), false)
        } else if let Some(text) = charter_text {
            (String::new(), text.to_string(), true)
        } else if record.status == Status::Public {
            (String::new(), PUBLIC_PLACEHOLDER.to_string(), false)
        } else {
            (restricted_notice(level).to_string(), String::new(), false)
        };

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            fields,
            archival,
            status_line,
            content,
            charter_text_shown,
        }
    }
}

/// One row of the projects index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRow {
    /// Project id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Link to the project page.
    pub href: String,
    /// Description, empty if none.
    pub description: String,
    /// Status label.
    pub status: &'static str,
}

impl ProjectRow {
    /// Build the row for a project.
    #[must_use]
    pub fn new(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            href: project_href(&project.id),
            description: project.description.clone().unwrap_or_default(),
            status: project.status.label(),
        }
    }
}

/// Rows for the projects index, in storage order.
#[must_use]
pub fn projects_table(directory: &Directory) -> Vec<ProjectRow> {
    directory.projects().iter().map(ProjectRow::new).collect()
}

/// A rendered project page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPage {
    /// Project id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Description, empty if none.
    pub description: String,
    /// Status label.
    pub status: &'static str,
    /// Linked records.
    pub records: Vec<RecordRow>,
}

/// Project detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ProjectView {
    /// Unknown id.
    Unavailable,
    /// Known project.
    Page(ProjectPage),
}

impl ProjectView {
    /// Render the detail view for `id`.
    #[must_use]
    pub fn render(directory: &Directory, id: Option<&str>) -> Self {
        let Some(project) = id.and_then(|id| directory.find_project(id)) else {
            return Self::Unavailable;
        };
        Self::Page(ProjectPage {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            status: project.status.label(),
            records: directory
                .filter_by_project(&project.id)
                .into_iter()
                .map(RecordRow::new)
                .collect(),
        })
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Unavailable => MISSING_PROJECT,
            Self::Page(page) => &page.name,
        }
    }
}

/// Link to a record page.
#[must_use]
pub fn record_href(id: &str) -> String {
    format!("record.html?id={}", encode_component(id))
}

/// Link to a project page.
#[must_use]
pub fn project_href(id: &str) -> String {
    format!("project.html?id={}", encode_component(id))
}

/// Percent-encode a query component, leaving the same characters unescaped
/// as a browser's `encodeURIComponent`.
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
