//! Per-record annotation log.
//!
//! Annotations are an append-only JSON array stored under
//! `annotations:<record id>`. Stored data that does not parse as a list of
//! annotations reads as an empty log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::directory::Directory;
use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::visibility::Viewer;

/// Notice shown after an annotation is stored.
pub const RECORDED_NOTICE: &str = "Annotation recorded.";

/// Shown in place of an empty list.
pub const EMPTY_NOTICE: &str = "No annotations recorded.";

/// Rendered in place of a timestamp that cannot be read.
pub const UNKNOWN_DATE: &str = "Unknown";

/// When an annotation was made, as stored.
///
/// New annotations store epoch milliseconds. Older or hand-edited entries
/// may hold a date string or something else entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// A date or date-time string.
    Text(String),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::Other(serde_json::Value::Null)
    }
}

impl Timestamp {
    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        Self::Millis(Utc::now().timestamp_millis())
    }

    /// Calendar date in UTC, if the stored value can be read as a time.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Millis(millis) => DateTime::from_timestamp_millis(*millis).map(|dt| dt.date_naive()),
            Self::Text(text) => parse_date_text(text),
            Self::Other(serde_json::Value::Number(number)) => number
                .as_f64()
                .filter(|millis| millis.is_finite())
                .and_then(|millis| {
                    #[allow(clippy::cast_possible_truncation)]
                    let millis = millis.trunc() as i64;
                    DateTime::from_timestamp_millis(millis)
                })
                .map(|dt| dt.date_naive()),
            Self::Other(_) => None,
        }
    }

    /// `YYYY-MM-DD` in UTC, or `"Unknown"`.
    #[must_use]
    pub fn render(&self) -> String {
        self.date()
            .map_or_else(|| UNKNOWN_DATE.to_string(), |date| date.format("%Y-%m-%d").to_string())
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// A free-text note attached to one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Note body.
    #[serde(default)]
    pub text: String,
    /// When it was made.
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl Annotation {
    /// A new annotation stamped with the current time.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// One rendered list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationItem {
    /// Note body.
    pub body: String,
    /// `YYYY-MM-DD` or `Unknown`.
    pub recorded: String,
}

impl AnnotationItem {
    /// Meta line under the body.
    #[must_use]
    pub fn meta(&self) -> String {
        format!("Recorded {}", self.recorded)
    }
}

/// Rendered annotation list. An empty list shows the empty-state marker.
#[must_use]
pub fn render(annotations: &[Annotation]) -> Vec<AnnotationItem> {
    annotations
        .iter()
        .map(|annotation| AnnotationItem {
            body: annotation.text.clone(),
            recorded: annotation.timestamp.render(),
        })
        .collect()
}

/// Storage key for a record's annotations.
#[must_use]
pub fn storage_key(record_id: &str) -> String {
    format!("annotations:{record_id}")
}

/// What the annotation section of a record page answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageReply {
    /// No record has the requested id.
    MissingRecord,
    /// The section, or its submission form, is hidden from the viewer.
    Hidden,
    /// The rendered list.
    Listed(Vec<AnnotationItem>),
    /// The annotation was stored.
    Recorded,
    /// Blank text; nothing was stored.
    Ignored,
}

/// Annotation lists persisted in a [`KeyValueStore`].
#[derive(Debug)]
pub struct AnnotationLog<S> {
    store: S,
}

impl<S: KeyValueStore> AnnotationLog<S> {
    /// Wrap a key/value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Annotations for `record_id` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store cannot be read.
    pub fn load(&self, record_id: &str) -> Result<Vec<Annotation>> {
        let key = storage_key(record_id);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(Vec::new());
        };
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&raw) {
            Ok(annotations) => Ok(annotations),
            Err(err) => {
                warn!("Treating unreadable annotations under {} as empty: {}", key, err);
                Ok(Vec::new())
            }
        }
    }

    /// The annotation list as `viewer` sees it on `record_id`'s page.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_on_page(
        &self,
        directory: &Directory,
        viewer: Viewer,
        record_id: &str,
    ) -> Result<PageReply> {
        if !viewer.shows_annotations() {
            return Ok(PageReply::Hidden);
        }
        if directory.find_record(record_id).is_none() {
            return Ok(PageReply::MissingRecord);
        }
        Ok(PageReply::Listed(render(&self.load(record_id)?)))
    }

    /// Submit the annotation form on `record_id`'s page as `viewer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn add_on_page(
        &self,
        directory: &Directory,
        viewer: Viewer,
        record_id: &str,
        text: &str,
    ) -> Result<PageReply> {
        if !viewer.shows_annotations() || !viewer.shows_annotation_form() {
            debug!("Annotation form hidden for {:?}", viewer);
            return Ok(PageReply::Hidden);
        }
        if directory.find_record(record_id).is_none() {
            return Ok(PageReply::MissingRecord);
        }
        Ok(match self.append(record_id, text)? {
            Some(_) => PageReply::Recorded,
            None => PageReply::Ignored,
        })
    }

    /// Append a note to `record_id`'s log.
    ///
    /// Blank text is ignored and returns `None`. Otherwise the whole list is
    /// persisted with the new entry last, and the new list is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn append(&self, record_id: &str, text: &str) -> Result<Option<Vec<Annotation>>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank annotation for {}", record_id);
            return Ok(None);
        }

        let mut annotations = self.load(record_id)?;
        annotations.push(Annotation::new(text));
        self.store
            .set(&storage_key(record_id), &serde_json::to_string(&annotations)?)?;
        debug!(
            "Stored annotation {} for {}",
            annotations.len(),
            record_id
        );
        Ok(Some(annotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clearance::ClearanceLevel;
    use crate::directory::{Division, Medium, Record, Status};
    use crate::storage::MemoryStore;

    #[test]
    fn test_load_absent_is_empty() {
        let log = AnnotationLog::new(MemoryStore::new());
        assert!(log.load("GC-R-001").unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let store = MemoryStore::new();
        for raw in ["{not json", "{\"text\": \"x\"}", "42", "[1, 2]"] {
            store.set(&storage_key("GC-R-001"), raw).unwrap();
            let log = AnnotationLog::new(&store);
            assert!(log.load("GC-R-001").unwrap().is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_blank_append_leaves_list_unchanged() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        log.append("GC-R-001", "first").unwrap();
        let before = store.get(&storage_key("GC-R-001")).unwrap();

        assert_eq!(log.append("GC-R-001", "   \n\t").unwrap(), None);
        assert_eq!(store.get(&storage_key("GC-R-001")).unwrap(), before);
    }

    #[test]
    fn test_blank_append_on_empty_log_writes_nothing() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        assert_eq!(log.append("GC-R-001", "").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_then_reload() {
        let store = MemoryStore::new();
        AnnotationLog::new(&store).append("GC-R-001", "note").unwrap();

        let reloaded = AnnotationLog::new(&store).load("GC-R-001").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].text, "note");
        assert!(reloaded[0].timestamp.date().is_some());
        assert!(matches!(reloaded[0].timestamp, Timestamp::Millis(_)));
    }

    #[test]
    fn test_append_preserves_order_and_trims() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        log.append("GC-R-001", "one").unwrap();
        log.append("GC-R-001", "  two  ").unwrap();
        log.append("GC-R-002", "elsewhere").unwrap();
        let list = log.append("GC-R-001", "three").unwrap().unwrap();

        let texts: Vec<&str> = list.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(log.load("GC-R-002").unwrap().len(), 1);
    }

    #[test]
    fn test_append_after_malformed_replaces_garbage() {
        let store = MemoryStore::new();
        store.set(&storage_key("GC-R-001"), "garbage").unwrap();
        let log = AnnotationLog::new(&store);

        let list = log.append("GC-R-001", "fresh").unwrap().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(log.load("GC-R-001").unwrap().len(), 1);
    }

    #[test]
    fn test_render_dates() {
        let annotations: Vec<Annotation> = serde_json::from_str(
            r#"[
                {"text": "millis", "timestamp": 1767225600000},
                {"text": "iso", "timestamp": "2031-05-04T23:30:00-02:00"},
                {"text": "date", "timestamp": "2030-12-31"},
                {"text": "float", "timestamp": 1767225600000.5},
                {"text": "garbage", "timestamp": "yesterday"},
                {"text": "missing"}
            ]"#,
        )
        .unwrap();

        let recorded: Vec<String> = render(&annotations)
            .into_iter()
            .map(|item| item.recorded)
            .collect();
        assert_eq!(
            recorded,
            vec![
                "2026-01-01",
                "2031-05-05",
                "2030-12-31",
                "2026-01-01",
                "Unknown",
                "Unknown"
            ]
        );
    }

    #[test]
    fn test_out_of_range_millis_unknown() {
        assert_eq!(Timestamp::Millis(i64::MAX).render(), UNKNOWN_DATE);
    }

    fn page_directory() -> Directory {
        Directory::new(
            vec![Record::new(
                "GC-R-001",
                "Deck Log",
                Division::Works,
                Medium::Text,
                2031,
                Status::Registered,
            )],
            vec![],
        )
    }

    #[test]
    fn test_list_hidden_below_witness() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        log.append("GC-R-001", "note").unwrap();

        for level in [ClearanceLevel::Public, ClearanceLevel::Registered] {
            let reply = log
                .list_on_page(&page_directory(), Viewer::new(level, false), "GC-R-001")
                .unwrap();
            assert_eq!(reply, PageReply::Hidden, "{level}");
        }

        let reply = log
            .list_on_page(
                &page_directory(),
                Viewer::new(ClearanceLevel::Witness, false),
                "GC-R-001",
            )
            .unwrap();
        let PageReply::Listed(items) = reply else {
            panic!("expected a listed reply");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, "note");
    }

    #[test]
    fn test_registered_admin_can_add() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        let viewer = Viewer::new(ClearanceLevel::Registered, true);

        let reply = log
            .add_on_page(&page_directory(), viewer, "GC-R-001", "seen")
            .unwrap();
        assert_eq!(reply, PageReply::Recorded);
        assert_eq!(log.load("GC-R-001").unwrap().len(), 1);
    }

    #[test]
    fn test_registered_non_admin_cannot_add() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        let viewer = Viewer::new(ClearanceLevel::Registered, false);

        let reply = log
            .add_on_page(&page_directory(), viewer, "GC-R-001", "seen")
            .unwrap();
        assert_eq!(reply, PageReply::Hidden);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_on_page_outcomes() {
        let store = MemoryStore::new();
        let log = AnnotationLog::new(&store);
        let viewer = Viewer::new(ClearanceLevel::Witness, false);
        let directory = page_directory();

        assert_eq!(
            log.add_on_page(&directory, viewer, "GC-R-404", "seen").unwrap(),
            PageReply::MissingRecord
        );
        assert_eq!(
            log.add_on_page(&directory, viewer, "GC-R-001", "  ").unwrap(),
            PageReply::Ignored
        );
        assert!(store.is_empty());
        assert_eq!(
            log.add_on_page(&directory, viewer, "GC-R-001", "seen").unwrap(),
            PageReply::Recorded
        );
        assert_eq!(
            log.list_on_page(&directory, viewer, "GC-R-404").unwrap(),
            PageReply::MissingRecord
        );
    }

    #[test]
    fn test_item_meta() {
        let item = AnnotationItem {
            body: "x".into(),
            recorded: "2030-01-02".into(),
        };
        assert_eq!(item.meta(), "Recorded 2030-01-02");
    }
}
