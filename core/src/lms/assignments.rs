//! Pure views over an assignment list, evaluated against a caller-supplied
//! reference time.
//!
//! Assignments without a due date, or with one that does not parse, never
//! appear in the upcoming or late views.

use crate::lms::Assignment;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// `<a ... title="T" ... href="U"`: group 1 is the title, group 2 the URL.
/// Anchors with `href` before `title`, or without a title, do not match.
static FILE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]*?title="([^"]*)"[^>]*?href="([^"]*)""#).expect("valid file link regex")
});

const DUE_DATE_DISPLAY_FORMAT: &str = "%B %d, %Y at %I:%M %p";

pub fn parse_due_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn pending_due_date(assignment: &Assignment) -> Option<DateTime<Utc>> {
    if assignment.is_submitted() {
        return None;
    }
    assignment.due_at.as_deref().and_then(parse_due_at)
}

/// Unsubmitted assignments due after `now` and no later than `now + days`.
/// A horizon past the representable date range has no upper bound.
pub fn upcoming_assignments(
    assignments: &[Assignment],
    days: u32,
    now: DateTime<Utc>,
) -> Vec<Assignment> {
    let cutoff = Duration::try_days(i64::from(days)).and_then(|d| now.checked_add_signed(d));
    assignments
        .iter()
        .filter(|a| {
            pending_due_date(a)
                .is_some_and(|due| now < due && cutoff.is_none_or(|cutoff| due <= cutoff))
        })
        .cloned()
        .collect()
}

/// Unsubmitted assignments whose due date has passed.
pub fn late_assignments(assignments: &[Assignment], now: DateTime<Utc>) -> Vec<Assignment> {
    assignments
        .iter()
        .filter(|a| pending_due_date(a).is_some_and(|due| due < now))
        .cloned()
        .collect()
}

/// First assignment, in list order, whose name contains `pattern`
/// ignoring case.
pub fn find_assignment_by_name<'a>(
    assignments: &'a [Assignment],
    pattern: &str,
) -> Option<&'a Assignment> {
    let pattern = pattern.to_lowercase();
    assignments
        .iter()
        .find(|a| a.name().to_lowercase().contains(&pattern))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLink {
    pub title: String,
    pub url: String,
}

pub fn extract_file_links(description: &str) -> Vec<FileLink> {
    if !description.contains("<a") {
        return vec![];
    }
    FILE_LINK_RE
        .captures_iter(description)
        .map(|cap| FileLink {
            title: cap[1].to_string(),
            url: cap[2].to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentDetails {
    pub id: Value,
    pub name: Value,
    pub due_at: Value,
    pub points_possible: Value,
    pub submission_types: Value,
    pub has_submitted_submissions: Value,
    pub allowed_attempts: Value,
    pub unlock_at: Value,
    pub lock_at: Value,
    pub description: Value,
    pub files: Vec<FileLink>,
    pub requires_submission: bool,
    pub is_quiz: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_due_date: Option<String>,
}

/// Project a raw assignment payload into the detail view. Returns `None`
/// when the backend handed back nothing.
pub fn assignment_details(raw: &Value) -> Option<AssignmentDetails> {
    let fields = raw.as_object().filter(|m| !m.is_empty())?;
    let field = |key: &str| fields.get(key).cloned().unwrap_or(Value::Null);
    let field_or = |key: &str, default: Value| fields.get(key).cloned().unwrap_or(default);

    let submission_types = field_or("submission_types", json!([]));
    let (requires_submission, is_quiz) = match submission_types.as_array() {
        Some(types) => (
            !types.is_empty(),
            types.iter().any(|t| t.as_str() == Some("online_quiz")),
        ),
        None => (false, false),
    };

    let files = fields
        .get("description")
        .and_then(Value::as_str)
        .map(extract_file_links)
        .unwrap_or_default();

    let formatted_due_date = fields
        .get("due_at")
        .and_then(Value::as_str)
        .and_then(parse_due_at)
        .map(|due| due.format(DUE_DATE_DISPLAY_FORMAT).to_string());

    Some(AssignmentDetails {
        id: field("id"),
        name: field("name"),
        due_at: field("due_at"),
        points_possible: field("points_possible"),
        submission_types,
        has_submitted_submissions: field_or("has_submitted_submissions", json!(false)),
        allowed_attempts: field_or("allowed_attempts", json!(-1)),
        unlock_at: field("unlock_at"),
        lock_at: field("lock_at"),
        description: field_or("description", json!("No description available")),
        files,
        requires_submission,
        is_quiz,
        formatted_due_date,
    })
}
