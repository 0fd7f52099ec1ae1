//! Built-in directory contents, used when no data files are configured.

use super::model::{Division, Medium, Project, Record, Status};

/// Identifier of the system charter, always listed first.
pub const CHARTER_ID: &str = "GC-R-000";

const CHARTER_TEXT: &str = "
The Gods Cruiseline Information System exists to maintain continuity,
record decisions, preserve artifacts, and regulate access.

This system does not promise transparency.
It promises consistency.

Records may be incomplete.
Archives may decay.
Access may be revoked.

Participation constitutes acknowledgment.
";

/// The charter as shipped, with its text.
#[must_use]
pub fn charter() -> Record {
    let mut record = Record::new(
        CHARTER_ID,
        "System Charter",
        Division::Access,
        Medium::System,
        2026,
        Status::Public,
    );
    record.content = Some(CHARTER_TEXT.to_string());
    record
}

/// Stand-in charter used when the record list does not carry one.
#[must_use]
pub fn synthetic_charter() -> Record {
    Record::new(
        CHARTER_ID,
        "System Charter",
        Division::Access,
        Medium::System,
        2036,
        Status::Public,
    )
}

/// Built-in record list.
#[must_use]
pub fn records() -> Vec<Record> {
    vec![charter()]
}

/// Built-in project list.
#[must_use]
pub fn projects() -> Vec<Project> {
    Vec::new()
}
