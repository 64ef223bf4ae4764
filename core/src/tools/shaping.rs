//! Reduces tool results before they are handed back to the model, to keep
//! the follow-up request small.

use crate::error::ToolError;
use crate::lms::{Assignment, Course};
use serde::Serialize;

/// The broad assignment listing keeps only this many entries.
pub const ASSIGNMENT_LIST_LIMIT: usize = 15;

/// Rendered text of one successful tool call. `item_count` is the length of
/// the underlying list before any truncation, for list-typed results.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub item_count: Option<usize>,
}

impl ToolOutput {
    pub fn render(label: &str, value: &impl Serialize) -> Result<Self, ToolError> {
        let json = serde_json::to_string_pretty(value).map_err(ToolError::Render)?;
        Ok(Self {
            text: format!("{label}: {json}"),
            item_count: None,
        })
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            item_count: None,
        }
    }

    pub fn with_item_count(mut self, count: usize) -> Self {
        self.item_count = Some(count);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct CourseBrief<'a> {
    pub id: i64,
    pub name: Option<&'a str>,
}

pub fn course_briefs(courses: &[Course]) -> Vec<CourseBrief<'_>> {
    courses
        .iter()
        .map(|c| CourseBrief {
            id: c.id,
            name: c.name.as_deref(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct AssignmentBrief<'a> {
    pub id: i64,
    pub name: Option<&'a str>,
    pub due_at: Option<&'a str>,
    pub points_possible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<bool>,
}

impl<'a> AssignmentBrief<'a> {
    fn new(assignment: &'a Assignment) -> Self {
        Self {
            id: assignment.id,
            name: assignment.name.as_deref(),
            due_at: assignment.due_at.as_deref(),
            points_possible: assignment.points_possible,
            submitted: None,
        }
    }
}

/// The broad listing: first [`ASSIGNMENT_LIST_LIMIT`] entries in backend
/// order, with the submitted flag.
pub fn assignment_listing(assignments: &[Assignment]) -> Vec<AssignmentBrief<'_>> {
    assignments
        .iter()
        .take(ASSIGNMENT_LIST_LIMIT)
        .map(|a| AssignmentBrief {
            submitted: Some(a.is_submitted()),
            ..AssignmentBrief::new(a)
        })
        .collect()
}

/// Filtered views (upcoming, late) are already narrow and are not truncated.
pub fn assignment_briefs(assignments: &[Assignment]) -> Vec<AssignmentBrief<'_>> {
    assignments.iter().map(AssignmentBrief::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn many(n: i64) -> Vec<Assignment> {
        (1..=n)
            .map(|i| Assignment::new(i, format!("HW {i}")).with_points(10.0))
            .collect()
    }

    #[test]
    fn listing_is_capped_and_keeps_backend_order() {
        let all = many(20);
        let listing = assignment_listing(&all);
        assert_eq!(listing.len(), ASSIGNMENT_LIST_LIMIT);
        assert_eq!(listing.first().map(|b| b.id), Some(1));
        assert_eq!(listing.last().map(|b| b.id), Some(15));
    }

    #[test]
    fn listing_includes_submitted_flag_but_briefs_do_not() {
        let list = many(1);
        let listing = serde_json::to_value(assignment_listing(&list)).unwrap();
        assert_eq!(listing[0]["submitted"], json!(false));

        let briefs = serde_json::to_value(assignment_briefs(&list)).unwrap();
        assert_eq!(
            briefs[0],
            json!({"id": 1, "name": "HW 1", "due_at": null, "points_possible": 10.0})
        );
    }

    #[test]
    fn course_briefs_drop_extra_fields() {
        let mut course = Course::new(3, "Chemistry");
        course.extra.insert("enrollments".into(), json!([{"type": "student"}]));
        let briefs = serde_json::to_value(course_briefs(&[course])).unwrap();
        assert_eq!(briefs, json!([{"id": 3, "name": "Chemistry"}]));
    }

    #[test]
    fn render_prefixes_label() {
        let output = ToolOutput::render("Courses", &json!([])).unwrap();
        assert_eq!(output.text, "Courses: []");
        assert_eq!(output.item_count, None);
    }
}
