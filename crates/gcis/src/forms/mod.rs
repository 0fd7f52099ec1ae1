//! Form capture for the internal tools.
//!
//! A [`Form`] is a list of tagged [`FormField`]s bound once when the form is
//! built. Submitting validates the required keys and, on success, produces a
//! typed [`Captured`] object ready for [`export::Exporter`]. No partial object
//! is ever produced, and a locked form never captures anything.

pub mod export;
pub mod project;
pub mod record;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::directory::{OneOrMany, Project, Record};
use crate::error::Result;
use crate::visibility::{Page, Viewer, ACCESS_RESTRICTED_NOTICE};

pub use export::Exporter;

/// Notice for a submission with a required field left empty.
pub const MISSING_FIELDS_NOTICE: &str = "Submission failed. Required fields missing.";

/// One bound form control with a uniform value accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Single-line text input.
    Input {
        /// Field key.
        key: &'static str,
        /// Current value.
        value: String,
    },
    /// Drop-down with fixed options.
    Select {
        /// Field key.
        key: &'static str,
        /// Current value as entered; may lie outside `options`.
        value: String,
        /// Allowed values.
        options: Vec<&'static str>,
    },
    /// Multi-line text.
    TextArea {
        /// Field key.
        key: &'static str,
        /// Current value.
        value: String,
        /// Whether the control is hidden.
        hidden: bool,
    },
}

impl FormField {
    /// Text input with an empty value.
    #[must_use]
    pub fn input(key: &'static str) -> Self {
        Self::Input {
            key,
            value: String::new(),
        }
    }

    /// Select with the given options and an empty value.
    #[must_use]
    pub fn select(key: &'static str, options: Vec<&'static str>) -> Self {
        Self::Select {
            key,
            value: String::new(),
            options,
        }
    }

    /// Visible text area with an empty value.
    #[must_use]
    pub fn text_area(key: &'static str) -> Self {
        Self::TextArea {
            key,
            value: String::new(),
            hidden: false,
        }
    }

    /// Field key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Input { key, .. } | Self::Select { key, .. } | Self::TextArea { key, .. } => *key,
        }
    }

    /// Current value, trimmed.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Input { value, .. }
            | Self::Select { value, .. }
            | Self::TextArea { value, .. } => value.trim(),
        }
    }

    /// Replace the value. A select keeps values outside its options; capture
    /// reports them as invalid.
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            Self::Input { value, .. }
            | Self::Select { value, .. }
            | Self::TextArea { value, .. } => {
                *value = new_value.to_string();
            }
        }
    }

    /// Whether the control is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::TextArea { hidden: true, .. })
    }
}

/// Trimmed values of a form, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(BTreeMap<&'static str, String>);

impl FieldValues {
    /// Value for `key`, empty if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }

    /// Value for `key` if non-empty.
    #[must_use]
    pub fn optional(&self, key: &str) -> Option<String> {
        Some(self.get(key))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Whether every key in `required` has a non-empty value.
    #[must_use]
    pub fn has_all(&self, required: &[&str]) -> bool {
        required.iter().all(|key| !self.get(key).is_empty())
    }

    /// Comma-separated value for `key`, see [`parse_csv`].
    #[must_use]
    pub fn csv(&self, key: &str) -> Option<OneOrMany> {
        parse_csv(self.get(key))
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&'static str, &str); N]> for FieldValues {
    fn from(pairs: [(&'static str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key, value.trim().to_string()))
                .collect(),
        )
    }
}

/// Split a comma-separated value into trimmed, non-empty items.
///
/// One item yields a single string, several yield a list in entry order
/// (duplicates kept) and none yields `None`.
#[must_use]
pub fn parse_csv(value: &str) -> Option<OneOrMany> {
    OneOrMany::from_items(
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Which tool a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Record filing.
    Record,
    /// Project registration.
    Project,
}

impl FormKind {
    /// The tool page hosting the form.
    #[must_use]
    pub fn page(self) -> Page {
        match self {
            Self::Record => Page::FileRecord,
            Self::Project => Page::RegisterProject,
        }
    }
}

/// A successfully captured object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    /// A filed record.
    Record(Record),
    /// A registered project.
    Project(Project),
}

impl Captured {
    /// Identifier of the captured object.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Record(record) => &record.id,
            Self::Project(project) => &project.id,
        }
    }

    /// Export file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::Record(record) => format!("record_{}.json", record.id),
            Self::Project(project) => format!("project_{}.json", project.id),
        }
    }

    /// Notice shown after a successful submission.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Record(record) => format!("Record {} filed successfully.", record.id),
            Self::Project(project) => format!("Project {} registered successfully.", project.id),
        }
    }

    /// Pretty-printed JSON body of the export.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        match self {
            Self::Record(record) => serde_json::to_string_pretty(record),
            Self::Project(project) => serde_json::to_string_pretty(project),
        }
    }
}

/// Why a submission produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A required field is empty.
    MissingRequired,
    /// A field holds a value that does not parse.
    Invalid(&'static str),
}

impl Rejection {
    /// Notice shown for the rejection.
    #[must_use]
    pub fn notice(self) -> String {
        match self {
            Self::MissingRequired => MISSING_FIELDS_NOTICE.to_string(),
            Self::Invalid(field) => format!("Submission failed. Invalid value for {field}."),
        }
    }
}

/// Result of submitting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// An object was captured and should be exported.
    Captured(Captured),
    /// Validation failed.
    Rejected(Rejection),
    /// The form is locked at the current clearance.
    Restricted,
}

impl FormOutcome {
    /// Notice shown after the submission.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Captured(captured) => captured.notice(),
            Self::Rejected(rejection) => rejection.notice(),
            Self::Restricted => ACCESS_RESTRICTED_NOTICE.to_string(),
        }
    }
}

/// What a tool page submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Outcome of the form.
    pub outcome: FormOutcome,
    /// Export file, written only for a captured object.
    pub exported: Option<PathBuf>,
}

impl Submission {
    /// Notice shown after the submission.
    #[must_use]
    pub fn notice(&self) -> String {
        self.outcome.notice()
    }
}

/// Fill and submit `form` as `viewer` would on its tool page, exporting the
/// captured object.
///
/// The form is locked when the page hides internal tools from the viewer.
/// Nothing is written unless the submission captures an object.
///
/// # Errors
///
/// Returns an error if the export cannot be written.
pub fn submit_and_export(
    form: &mut Form,
    viewer: Viewer,
    values: &[(&str, &str)],
    exporter: &Exporter,
) -> Result<Submission> {
    form.set_locked(viewer.visibility(form.kind().page()).forms_locked);
    for (key, value) in values {
        form.set(key, value);
    }

    let outcome = form.submit();
    let exported = match &outcome {
        FormOutcome::Captured(captured) => Some(exporter.export(captured)?),
        FormOutcome::Rejected(_) | FormOutcome::Restricted => None,
    };
    Ok(Submission { outcome, exported })
}

/// A bound tool form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    kind: FormKind,
    fields: Vec<FormField>,
    locked: bool,
}

impl Form {
    /// The record filing form.
    #[must_use]
    pub fn record() -> Self {
        let mut form = Self {
            kind: FormKind::Record,
            fields: record::fields(),
            locked: false,
        };
        form.sync_archival_note();
        form
    }

    /// The project registration form.
    #[must_use]
    pub fn project() -> Self {
        Self {
            kind: FormKind::Project,
            fields: project::fields(),
            locked: false,
        }
    }

    /// Which tool this form belongs to.
    #[must_use]
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Bound fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Disable or enable every control. A locked form ignores input and
    /// answers submissions with the access-restricted notice.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Whether the form is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Set a field value. Returns `false` for unknown keys or a locked form.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if self.locked {
            return false;
        }
        let Some(field) = self.fields.iter_mut().find(|field| field.key() == key) else {
            debug!("Ignoring unknown form field '{}'", key);
            return false;
        };
        field.set_value(value);
        if key == record::ARCHIVAL_STATE {
            self.sync_archival_note();
        }
        true
    }

    /// Look up a bound field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.key() == key)
    }

    /// Current trimmed values.
    #[must_use]
    pub fn values(&self) -> FieldValues {
        FieldValues(
            self.fields
                .iter()
                .map(|field| (field.key(), field.value().to_string()))
                .collect(),
        )
    }

    /// Submit the form.
    #[must_use]
    pub fn submit(&self) -> FormOutcome {
        if self.locked {
            return FormOutcome::Restricted;
        }
        let values = self.values();
        let captured = match self.kind {
            FormKind::Record => record::capture(&values).map(Captured::Record),
            FormKind::Project => project::capture(&values).map(Captured::Project),
        };
        match captured {
            Ok(captured) => FormOutcome::Captured(captured),
            Err(rejection) => {
                debug!("Form submission rejected: {:?}", rejection);
                FormOutcome::Rejected(rejection)
            }
        }
    }

    /// The archival note is only shown for archived or decayed records and
    /// is cleared whenever it is hidden.
    fn sync_archival_note(&mut self) {
        let state = self
            .field(record::ARCHIVAL_STATE)
            .map(|field| field.value().to_string())
            .unwrap_or_default();
        let show = state == "archived" || state == "decayed";
        if let Some(FormField::TextArea { value, hidden, .. }) = self
            .fields
            .iter_mut()
            .find(|field| field.key() == record::ARCHIVAL_NOTE)
        {
            *hidden = !show;
            if !show {
                value.clear();
            }
        }
    }
}
