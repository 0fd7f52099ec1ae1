//! The project registration form.

use crate::directory::{Choice, Project, Status};

use super::{FieldValues, FormField, Rejection};

/// Keys that must be non-empty for a project to be registered.
pub const REQUIRED: &[&str] = &["id", "name", "status"];

/// Bound controls of the form, in display order.
#[must_use]
pub fn fields() -> Vec<FormField> {
    vec![
        FormField::input("id"),
        FormField::input("name"),
        FormField::select(
            "status",
            Status::ALL.iter().map(|status| status.as_str()).collect(),
        ),
        FormField::text_area("description"),
        FormField::input("lead"),
        FormField::text_area("scope"),
        FormField::input("startYear"),
        FormField::input("endYear"),
    ]
}

/// Build a project from submitted values.
///
/// Year fields that are not whole numbers are left out.
///
/// # Errors
///
/// Returns a [`Rejection`] if a required field is empty or the status does
/// not parse.
pub fn capture(values: &FieldValues) -> Result<Project, Rejection> {
    if !values.has_all(REQUIRED) {
        return Err(Rejection::MissingRequired);
    }
    let status = Status::parse(values.get("status")).ok_or(Rejection::Invalid("status"))?;

    let mut project = Project::new(values.get("id"), values.get("name"), status);
    project.description = values.optional("description");
    project.lead = values.optional("lead");
    project.scope = values.optional("scope");
    project.start_year = whole_year(values.get("startYear"));
    project.end_year = whole_year(values.get("endYear"));
    Ok(project)
}

/// A year written in any numeric notation (`2030`, `2030.0`, `2.03e3`),
/// or `None` when it is not a whole number.
#[allow(clippy::cast_possible_truncation)]
fn whole_year(value: &str) -> Option<i32> {
    let number: f64 = value.parse().ok()?;
    if number.fract() != 0.0 || number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
        return None;
    }
    Some(number as i32)
}
