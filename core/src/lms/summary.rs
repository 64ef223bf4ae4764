use crate::error::LmsError;
use crate::lms::{Assignment, Course, late_assignments, upcoming_assignments};
use crate::traits::LmsApi;
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::Serialize;

/// Horizon used for the "upcoming" half of the summary.
pub const SUMMARY_HORIZON_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub course_name: Option<String>,
    pub course_id: i64,
    pub assignment_name: Option<String>,
    pub assignment_id: i64,
    pub due_date: Option<String>,
    pub points_possible: Option<f64>,
}

impl SummaryEntry {
    fn new(course: &Course, assignment: &Assignment) -> Self {
        Self {
            course_name: course.name.clone(),
            course_id: course.id,
            assignment_name: assignment.name.clone(),
            assignment_id: assignment.id,
            due_date: assignment.due_at.clone(),
            points_possible: assignment.points_possible,
        }
    }

    fn sort_key(&self) -> &str {
        self.due_date.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSummary {
    pub courses: usize,
    pub courses_checked: usize,
    pub late_assignments: Vec<SummaryEntry>,
    pub upcoming_assignments: Vec<SummaryEntry>,
}

/// Late and soon-due work across the given courses, each list ordered by the
/// due-date string. ISO-8601 UTC strings sort chronologically; anything else
/// sorts by its literal text.
pub fn build_summary(
    courses: &[(Course, Vec<Assignment>)],
    now: DateTime<Utc>,
) -> AssignmentSummary {
    let mut late = Vec::new();
    let mut upcoming = Vec::new();

    for (course, assignments) in courses {
        late.extend(
            late_assignments(assignments, now)
                .iter()
                .map(|a| SummaryEntry::new(course, a)),
        );
        upcoming.extend(
            upcoming_assignments(assignments, SUMMARY_HORIZON_DAYS, now)
                .iter()
                .map(|a| SummaryEntry::new(course, a)),
        );
    }

    late.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    upcoming.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

    AssignmentSummary {
        courses: courses.len(),
        courses_checked: courses.len(),
        late_assignments: late,
        upcoming_assignments: upcoming,
    }
}

/// Fetch up to `max_courses` courses and summarize them. `None` means the
/// user has no courses at all.
pub async fn assignment_summary(
    api: &dyn LmsApi,
    max_courses: usize,
    now: DateTime<Utc>,
) -> Result<Option<AssignmentSummary>, LmsError> {
    let courses = api.get_courses().await?;
    if courses.is_empty() {
        return Ok(None);
    }

    let checked: Vec<Course> = courses.into_iter().take(max_courses).collect();
    let assignments = try_join_all(checked.iter().map(|c| api.get_assignments(c.id))).await?;
    let per_course: Vec<(Course, Vec<Assignment>)> = checked.into_iter().zip(assignments).collect();

    Ok(Some(build_summary(&per_course, now)))
}
