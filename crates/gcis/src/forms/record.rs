//! The record filing form.

use crate::directory::{
    Archival, ArchivalState, Choice, Division, Medium, Record, Sensitivity, Status,
};

use super::{FieldValues, FormField, Rejection};

/// Key of the archival state select.
pub const ARCHIVAL_STATE: &str = "archivalState";

/// Key of the archival note text area.
pub const ARCHIVAL_NOTE: &str = "archivalNote";

/// Keys that must be non-empty for a record to be filed.
pub const REQUIRED: &[&str] = &[
    "id",
    "title",
    "division",
    "medium",
    "year",
    "status",
    ARCHIVAL_STATE,
];

fn options<C: Choice>() -> Vec<&'static str> {
    C::ALL.iter().map(|choice| choice.as_str()).collect()
}

/// Bound controls of the form, in display order.
#[must_use]
pub fn fields() -> Vec<FormField> {
    let mut archival_state = FormField::select(ARCHIVAL_STATE, options::<ArchivalState>());
    archival_state.set_value(ArchivalState::Active.as_str());

    vec![
        FormField::input("id"),
        FormField::input("title"),
        FormField::select("division", options::<Division>()),
        FormField::select("medium", options::<Medium>()),
        FormField::input("year"),
        FormField::select("status", options::<Status>()),
        FormField::input("author"),
        FormField::input("origin"),
        FormField::input("sourceRef"),
        FormField::input("dateCreated"),
        FormField::input("datePublished"),
        FormField::input("tags"),
        FormField::input("sensitivityLevel"),
        FormField::text_area("sensitivityNote"),
        FormField::text_area("context"),
        FormField::input("project"),
        archival_state,
        FormField::text_area(ARCHIVAL_NOTE),
    ]
}

fn choice<C: Choice>(values: &FieldValues, key: &'static str) -> Result<C, Rejection> {
    C::parse(values.get(key)).ok_or(Rejection::Invalid(key))
}

/// Build a record from submitted values.
///
/// # Errors
///
/// Returns a [`Rejection`] if a required field is empty or a typed field
/// does not parse.
pub fn capture(values: &FieldValues) -> Result<Record, Rejection> {
    if !values.has_all(REQUIRED) {
        return Err(Rejection::MissingRequired);
    }

    let year: i32 = values
        .get("year")
        .parse()
        .map_err(|_| Rejection::Invalid("year"))?;
    let archival_state: ArchivalState = choice(values, ARCHIVAL_STATE)?;

    let mut record = Record::new(
        values.get("id"),
        values.get("title"),
        choice(values, "division")?,
        choice(values, "medium")?,
        year,
        choice(values, "status")?,
    );

    record.author = values.csv("author");
    record.origin = values.optional("origin");
    record.source_ref = values.optional("sourceRef");
    record.date_created = values.optional("dateCreated");
    record.date_published = values.optional("datePublished");
    record.tags = values.csv("tags");
    record.sensitivity = values.optional("sensitivityLevel").map(|level| Sensitivity {
        level,
        note: values.get("sensitivityNote").to_string(),
    });
    record.context = values.optional("context");
    record.project = values.csv("project");

    if archival_state != ArchivalState::Active {
        record.archival = Some(Archival {
            state: archival_state,
            since: Some(year),
            note: values.get(ARCHIVAL_NOTE).to_string(),
        });
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::OneOrMany;
    use crate::forms::{Captured, Form, FormOutcome};

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("id", "GC-R-014"),
            ("title", "Harbor Log"),
            ("division", "research"),
            ("medium", "text"),
            ("year", "2031"),
            ("status", "registered"),
            (ARCHIVAL_STATE, "active"),
        ]
    }

    fn filled(pairs: &[(&'static str, &str)]) -> Form {
        let mut form = Form::record();
        for (key, value) in pairs {
            assert!(form.set(key, value), "{key}");
        }
        form
    }

    #[test]
    fn test_any_missing_required_field_rejects() {
        for missing in REQUIRED {
            let pairs: Vec<_> = complete()
                .into_iter()
                .map(|(key, value)| if key == *missing { (key, "  ") } else { (key, value) })
                .collect();
            let outcome = filled(&pairs).submit();

            assert_eq!(
                outcome,
                FormOutcome::Rejected(Rejection::MissingRequired),
                "{missing}"
            );
            assert_eq!(outcome.notice(), "Submission failed. Required fields missing.");
        }
    }

    #[test]
    fn test_minimal_record() {
        let FormOutcome::Captured(Captured::Record(record)) = filled(&complete()).submit() else {
            panic!("expected a captured record");
        };
        assert_eq!(record.id, "GC-R-014");
        assert_eq!(record.year, 2031);
        assert_eq!(record.status, Status::Registered);
        assert!(record.archival.is_none());
        assert!(record.tags.is_none());
        assert!(record.sensitivity.is_none());
    }

    #[test]
    fn test_tags_keep_duplicates() {
        let mut pairs = complete();
        pairs.push(("tags", "a, b, b"));
        let record = capture(&filled(&pairs).values()).unwrap();
        assert_eq!(
            record.tags,
            Some(OneOrMany::Many(vec!["a".into(), "b".into(), "b".into()]))
        );
    }

    #[test]
    fn test_single_author_and_project_lists() {
        let mut pairs = complete();
        pairs.push(("author", " Vale "));
        pairs.push(("project", "p1, p2"));
        let record = capture(&filled(&pairs).values()).unwrap();
        assert_eq!(record.author, Some(OneOrMany::One("Vale".into())));
        assert!(record.in_project("p2"));
    }

    #[test]
    fn test_archival_attached_when_not_active() {
        let mut pairs = complete();
        pairs.retain(|(key, _)| *key != ARCHIVAL_STATE);
        pairs.push((ARCHIVAL_STATE, "archived"));
        pairs.push((ARCHIVAL_NOTE, "moved to cold storage"));
        let record = capture(&filled(&pairs).values()).unwrap();

        let archival = record.archival.unwrap();
        assert_eq!(archival.state, ArchivalState::Archived);
        assert_eq!(archival.since, Some(2031));
        assert_eq!(archival.note, "moved to cold storage");
    }

    #[test]
    fn test_sensitivity_note_defaults_to_empty() {
        let mut pairs = complete();
        pairs.push(("sensitivityLevel", "high"));
        let record = capture(&filled(&pairs).values()).unwrap();
        assert_eq!(
            record.sensitivity,
            Some(Sensitivity {
                level: "high".into(),
                note: String::new()
            })
        );
    }

    #[test]
    fn test_invalid_year_rejected() {
        let values = FieldValues::from([
            ("id", "GC-R-014"),
            ("title", "Harbor Log"),
            ("division", "research"),
            ("medium", "text"),
            ("year", "soon"),
            ("status", "registered"),
            (ARCHIVAL_STATE, "active"),
        ]);
        assert_eq!(capture(&values), Err(Rejection::Invalid("year")));
    }

    #[test]
    fn test_invalid_division_rejected() {
        let values = FieldValues::from([
            ("id", "GC-R-014"),
            ("title", "Harbor Log"),
            ("division", "logistics"),
            ("medium", "text"),
            ("year", "2031"),
            ("status", "registered"),
            (ARCHIVAL_STATE, "active"),
        ]);
        assert_eq!(capture(&values), Err(Rejection::Invalid("division")));
    }

    #[test]
    fn test_export_shape() {
        let mut pairs = complete();
        pairs.push(("sourceRef", "tape 4"));
        pairs.push(("tags", "x"));
        let record = capture(&filled(&pairs).values()).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["sourceRef"], "tape 4");
        assert_eq!(value["tags"], "x");
        assert_eq!(value["year"], 2031);
        assert!(value.get("author").is_none());
        assert!(value.get("archival").is_none());
    }
}
