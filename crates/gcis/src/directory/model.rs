//! Record and project models.
//!
//! Field names serialize in camelCase to match the exported JSON files and
//! the externally supplied data lists.

use serde::{Deserialize, Serialize};

/// A closed set of string-valued choices with display labels.
pub trait Choice: Copy + Sized + 'static {
    /// Every choice, in display order.
    const ALL: &'static [Self];

    /// Serialized value.
    fn as_str(self) -> &'static str;

    /// Display label.
    fn label(self) -> &'static str;

    /// Parse a serialized value. Matching is exact.
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.as_str() == value)
    }
}

/// Organizational division a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    /// Broadcast division.
    Broadcast,
    /// Works division.
    Works,
    /// Research division.
    Research,
    /// Narrative division.
    Narrative,
    /// Exchange division.
    Exchange,
    /// Access division.
    Access,
}

impl Choice for Division {
    const ALL: &'static [Self] = &[
        Self::Broadcast,
        Self::Works,
        Self::Research,
        Self::Narrative,
        Self::Exchange,
        Self::Access,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Works => "works",
            Self::Research => "research",
            Self::Narrative => "narrative",
            Self::Exchange => "exchange",
            Self::Access => "access",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Broadcast => "Broadcast",
            Self::Works => "Works",
            Self::Research => "Research",
            Self::Narrative => "Narrative",
            Self::Exchange => "Exchange",
            Self::Access => "Access",
        }
    }
}

/// Medium of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    /// Written text.
    Text,
    /// Audio recording.
    Audio,
    /// Video recording.
    Video,
    /// System document.
    System,
    /// Still image.
    Image,
    /// Dataset.
    Dataset,
    /// Physical artifact.
    Artifact,
}

impl Choice for Medium {
    const ALL: &'static [Self] = &[
        Self::Text,
        Self::Audio,
        Self::Video,
        Self::System,
        Self::Image,
        Self::Dataset,
        Self::Artifact,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::System => "system",
            Self::Image => "image",
            Self::Dataset => "dataset",
            Self::Artifact => "artifact",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::System => "System",
            Self::Image => "Image",
            Self::Dataset => "Dataset",
            Self::Artifact => "Artifact",
        }
    }
}

/// Publication status of a record or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Content may be shown to anyone.
    Public,
    /// Registered readers.
    Registered,
    /// Authorized readers.
    Authorized,
    /// Rows cannot be opened.
    Restricted,
}

impl Choice for Status {
    const ALL: &'static [Self] = &[
        Self::Public,
        Self::Registered,
        Self::Authorized,
        Self::Restricted,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Registered => "registered",
            Self::Authorized => "authorized",
            Self::Restricted => "restricted",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Registered => "Registered",
            Self::Authorized => "Authorized",
            Self::Restricted => "Restricted",
        }
    }
}

/// Lifecycle marker, independent of [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchivalState {
    /// Current record.
    #[default]
    Active,
    /// Kept for reference.
    Archived,
    /// Content is gone.
    Decayed,
}

impl Choice for ArchivalState {
    const ALL: &'static [Self] = &[Self::Active, Self::Archived, Self::Decayed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Decayed => "decayed",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archived => "Archived",
            Self::Decayed => "Decayed",
        }
    }
}

/// Archival sub-state attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archival {
    /// Lifecycle state.
    pub state: ArchivalState,
    /// Year the state took effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<i32>,
    /// Free-text note.
    #[serde(default)]
    pub note: String,
}

/// Sensitivity marking on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// Sensitivity level as entered.
    pub level: String,
    /// Accompanying note.
    #[serde(default)]
    pub note: String,
}

/// A field that holds either one value or an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single value.
    One(String),
    /// Several values, in entry order.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Build from parsed items: `None` when empty, a single string for one
    /// item and a list otherwise.
    #[must_use]
    pub fn from_items(mut items: Vec<String>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop().map(Self::One),
            _ => Some(Self::Many(items)),
        }
    }

    /// Whether `value` is the single value or one of the list entries.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::One(one) => one == value,
            Self::Many(many) => many.iter().any(|item| item == value),
        }
    }

    /// Values in order.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::One(one) => vec![one.as_str()],
            Self::Many(many) => many.iter().map(String::as_str).collect(),
        }
    }
}

/// A record in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Division.
    pub division: Division,
    /// Medium.
    pub medium: Medium,
    /// Year of record.
    pub year: i32,
    /// Publication status.
    pub status: Status,
    /// Author or authors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<OneOrMany>,
    /// Origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Source reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    /// Creation date as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    /// Publication date as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    /// Tags, duplicates kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<OneOrMany>,
    /// Sensitivity marking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Sensitivity>,
    /// Context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Linked project id or ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<OneOrMany>,
    /// Archival sub-state. Absent means active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archival: Option<Archival>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Record {
    /// Create a record with only the required fields set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        division: Division,
        medium: Medium,
        year: i32,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            division,
            medium,
            year,
            status,
            author: None,
            origin: None,
            source_ref: None,
            date_created: None,
            date_published: None,
            tags: None,
            sensitivity: None,
            context: None,
            project: None,
            archival: None,
            content: None,
        }
    }

    /// Archival state, defaulting to active.
    #[must_use]
    pub fn archival_state(&self) -> ArchivalState {
        self.archival
            .as_ref()
            .map_or(ArchivalState::Active, |archival| archival.state)
    }

    /// Whether the record is linked to `project_id`.
    #[must_use]
    pub fn in_project(&self, project_id: &str) -> bool {
        self.project
            .as_ref()
            .is_some_and(|project| project.contains(project_id))
    }
}

/// A project grouping records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier.
    pub id: String,
    /// Name.
    pub name: String,
    /// Publication status.
    pub status: Status,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project lead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    /// Scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// First year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    /// Last year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
}

impl Project {
    /// Create a project with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            description: None,
            lead: None,
            scope: None,
            start_year: None,
            end_year: None,
        }
    }
}
