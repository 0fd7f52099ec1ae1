//! Error types for gcis.
//!
//! Only infrastructure failures (database, filesystem, configuration) are
//! errors. User-facing failures such as missing form fields, unknown ids or
//! malformed annotation storage resolve to notices and placeholders instead.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gcis operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Directory Errors ===
    /// Record or project data could not be loaded.
    #[error("failed to load directory data from {path}: {source}")]
    DataLoad {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A configured data file could not be read.
    #[error("failed to read directory data from {path}: {source}")]
    DataRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Export Errors ===
    /// An identifier cannot be used as part of an export file name.
    #[error("identifier '{id}' cannot be used in an export file name")]
    UnsafeExportId {
        /// The rejected identifier.
        id: String,
    },

    /// Writing an export file failed.
    #[error("failed to write export {path}: {source}")]
    Export {
        /// Path of the export file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for gcis operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an unsafe export id error.
    #[must_use]
    pub fn unsafe_export_id(id: impl Into<String>) -> Self {
        Self::UnsafeExportId { id: id.into() }
    }

    /// Check if this error came from the storage backend.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_export_id_display() {
        let err = Error::unsafe_export_id("../etc/passwd");
        let msg = err.to_string();
        assert!(msg.contains("../etc/passwd"));
        assert!(msg.contains("export file name"));
    }

    #[test]
    fn test_is_storage_error() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.is_storage_error());
        assert!(!Error::unsafe_export_id("x").is_storage_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "read_delay_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("read_delay_secs"));
    }

    #[test]
    fn test_data_load_error_display() {
        let source = serde_json::from_str::<Vec<i32>>("{").unwrap_err();
        let err = Error::DataLoad {
            path: PathBuf::from("/data/records.json"),
            source,
        };
        assert!(err.to_string().contains("/data/records.json"));
    }

    #[test]
    fn test_data_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::DataRead {
            path: PathBuf::from("/data/projects.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/projects.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_export_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::Export {
            path: PathBuf::from("/exports/record_GC-R-001.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("record_GC-R-001.json"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
