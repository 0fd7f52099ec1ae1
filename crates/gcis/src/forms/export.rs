//! Writes captured objects to JSON files named by id.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::error::{Error, Result};

use super::Captured;

/// Identifiers allowed in export file names.
fn safe_id() -> &'static Regex {
    static SAFE_ID: OnceLock<Regex> = OnceLock::new();
    SAFE_ID.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("export id pattern is valid")
    })
}

/// Writes `record_<id>.json` and `project_<id>.json` files.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Export into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the object would be written to.
    ///
    /// # Errors
    ///
    /// Returns an error if the id cannot be used in a file name.
    pub fn path_for(&self, captured: &Captured) -> Result<PathBuf> {
        if !safe_id().is_match(captured.id()) {
            return Err(Error::unsafe_export_id(captured.id()));
        }
        Ok(self.dir.join(captured.file_name()))
    }

    /// Write the object as pretty-printed JSON, replacing any earlier export
    /// with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unsafe, or the directory or file cannot
    /// be written.
    pub fn export(&self, captured: &Captured) -> Result<PathBuf> {
        let path = self.path_for(captured)?;
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
                path: self.dir.clone(),
                source,
            })?;
        }

        let json = captured.to_json_pretty()?;
        std::fs::write(&path, json).map_err(|source| Error::Export {
            path: path.clone(),
            source,
        })?;

        info!("Exported {} to {}", captured.id(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Division, Medium, OneOrMany, Project, Record, Status};

    #[test]
    fn test_export_record_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("out"));

        let mut record = Record::new(
            "GC-R-014",
            "Harbor Log",
            Division::Research,
            Medium::Text,
            2031,
            Status::Registered,
        );
        record.tags = Some(OneOrMany::Many(vec!["a".into(), "b".into()]));
        let path = exporter.export(&Captured::Record(record.clone())).unwrap();

        assert_eq!(path.file_name().unwrap(), "record_GC-R-014.json");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"id\": \"GC-R-014\""));
        let parsed: Record = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_export_project() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let path = exporter
            .export(&Captured::Project(Project::new("p1", "Tide", Status::Public)))
            .unwrap();
        assert_eq!(path, dir.path().join("project_p1.json"));
    }

    #[test]
    fn test_unsafe_ids_rejected() {
        let exporter = Exporter::new("/tmp");
        for id in ["../escape", "a/b", ".hidden", ""] {
            let captured = Captured::Project(Project::new(id, "x", Status::Public));
            assert!(
                matches!(exporter.path_for(&captured), Err(Error::UnsafeExportId { .. })),
                "{id}"
            );
        }
    }
}
