//! Record and project directory.
//!
//! The directory is read-only input: fixed lists supplied from JSON files or
//! the built-in defaults. Lookups never fail; a missing id is `None` and the
//! views in [`view`] turn that into an "unavailable" placeholder.

pub mod data;
pub mod model;
pub mod view;

use std::borrow::Cow;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::DataConfig;
use crate::error::{Error, Result};

pub use data::CHARTER_ID;
pub use model::{
    Archival, ArchivalState, Choice, Division, Medium, OneOrMany, Project, Record, Sensitivity,
    Status,
};

/// Static record and project lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    records: Vec<Record>,
    projects: Vec<Project>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Directory {
    /// Create a directory over the given lists.
    #[must_use]
    pub fn new(records: Vec<Record>, projects: Vec<Project>) -> Self {
        Self { records, projects }
    }

    /// The built-in lists.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(data::records(), data::projects())
    }

    /// Load lists from the configured files, using built-in lists for
    /// anything not configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured file cannot be read or parsed.
    pub fn load(config: &DataConfig) -> Result<Self> {
        let records = match &config.records_path {
            Some(path) => read_list(path)?,
            None => data::records(),
        };
        let projects = match &config.projects_path {
            Some(path) => read_list(path)?,
            None => data::projects(),
        };
        info!(
            "Directory loaded with {} records and {} projects",
            records.len(),
            projects.len()
        );
        Ok(Self::new(records, projects))
    }

    /// Records in storage order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Projects in storage order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Records for the index, with the charter pinned first.
    ///
    /// If the list has no charter, a synthetic one takes its place.
    #[must_use]
    pub fn list_records(&self) -> Vec<Cow<'_, Record>> {
        let charter = match self.records.iter().find(|record| record.id == CHARTER_ID) {
            Some(charter) => Cow::Borrowed(charter),
            None => {
                debug!("No charter in record list, substituting default");
                Cow::Owned(data::synthetic_charter())
            }
        };

        let mut listed = Vec::with_capacity(self.records.len() + 1);
        listed.push(charter);
        // Only the first charter entry is pinned; later duplicates keep their place.
        let mut pinned = false;
        for record in &self.records {
            if record.id == CHARTER_ID && !pinned {
                pinned = true;
                continue;
            }
            listed.push(Cow::Borrowed(record));
        }
        listed
    }

    /// Find a record by id.
    ///
    /// The charter id always resolves, falling back to the synthetic charter.
    #[must_use]
    pub fn find_record(&self, id: &str) -> Option<Cow<'_, Record>> {
        match self.records.iter().find(|record| record.id == id) {
            Some(record) => Some(Cow::Borrowed(record)),
            None if id == CHARTER_ID => Some(Cow::Owned(data::synthetic_charter())),
            None => None,
        }
    }

    /// Records linked to `project_id`, in storage order.
    #[must_use]
    pub fn filter_by_project(&self, project_id: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| record.in_project(project_id))
            .collect()
    }

    /// Find a project by id.
    #[must_use]
    pub fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::DataRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::DataLoad {
        path: path.to_path_buf(),
        source,
    })
}
