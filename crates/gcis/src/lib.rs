//! `gcis` - Core logic of a clearance-gated records archive
//!
//! This library tracks a local clearance profile, decides what each page
//! shows at a given clearance, serves the records and projects directories,
//! captures filed records and registered projects as JSON, keeps per-record
//! annotation logs, and runs the one-time charter read upgrade.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod annotations;
pub mod charter;
pub mod clearance;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod forms;
pub mod logging;
pub mod storage;
pub mod visibility;

pub use annotations::{Annotation, AnnotationLog};
pub use charter::{CharterReader, ReadOutcome, ReadTracker};
pub use clearance::{ClearanceLevel, ClearanceStore, PassphraseOutcome};
pub use config::Config;
pub use directory::{Directory, Project, Record};
pub use error::{Error, Result};
pub use forms::{Exporter, Form, FormOutcome};
pub use logging::init_logging;
pub use storage::{KeyValueStore, MemoryStore, Storage};
pub use visibility::{Page, Viewer, Visibility};
