use crate::error::{ToolDispatchError, ToolError};
use crate::lms::{
    assignment_details, assignment_summary, find_assignment_by_name, late_assignments,
    upcoming_assignments,
};
use crate::tools::shaping::{assignment_briefs, assignment_listing, course_briefs};
use crate::tools::{ToolOutput, ToolRequest, tool_catalog};
use crate::traits::{LmsApi, ToolInvocation, ToolSpec};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one dispatched invocation. Lives only for one dispatch cycle.
#[derive(Debug)]
pub enum ToolOutcome {
    Success { name: String, output: ToolOutput },
    Failure(ToolDispatchError),
}

impl ToolOutcome {
    pub fn name(&self) -> &str {
        match self {
            ToolOutcome::Success { name, .. } => name,
            ToolOutcome::Failure(err) => &err.tool,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

pub struct ToolRegistry {
    lms: Arc<dyn LmsApi>,
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new(lms: Arc<dyn LmsApi>) -> Self {
        Self {
            lms,
            specs: tool_catalog(),
        }
    }

    pub fn get_specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Run one invocation. Never fails: errors come back as
    /// [`ToolOutcome::Failure`] tagged with the tool name.
    pub async fn dispatch(&self, invocation: &ToolInvocation) -> ToolOutcome {
        debug!(
            "Handling tool call: {} with arguments: {}",
            invocation.name, invocation.arguments
        );

        let result = match ToolRequest::decode(&invocation.name, &invocation.arguments) {
            Ok(request) => self.execute(request, Utc::now()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(output) => ToolOutcome::Success {
                name: invocation.name.clone(),
                output,
            },
            Err(source) => {
                let err = ToolDispatchError::new(&invocation.name, source);
                warn!("{}", err);
                ToolOutcome::Failure(err)
            }
        }
    }

    pub async fn execute(
        &self,
        request: ToolRequest,
        now: DateTime<Utc>,
    ) -> Result<ToolOutput, ToolError> {
        let lms = self.lms.as_ref();

        match request {
            ToolRequest::GetCourses {} => {
                let courses = lms.get_courses().await?;
                Ok(ToolOutput::render("Courses", &course_briefs(&courses))?
                    .with_item_count(courses.len()))
            }
            ToolRequest::GetCourseDetails { course_id } => {
                let course = lms.get_course(course_id).await?;
                ToolOutput::render("Course Details", &course)
            }
            ToolRequest::GetAssignments { course_id } => {
                let assignments = lms.get_assignments(course_id).await?;
                Ok(
                    ToolOutput::render("Assignments", &assignment_listing(&assignments))?
                        .with_item_count(assignments.len()),
                )
            }
            ToolRequest::GetAssignmentSummary { max_courses } => {
                match assignment_summary(lms, max_courses, now).await? {
                    Some(summary) => ToolOutput::render("Assignment Summary", &summary),
                    None => ToolOutput::render(
                        "Assignment Summary",
                        &json!({"summary": "No courses found"}),
                    ),
                }
            }
            ToolRequest::GetUpcomingAssignments { course_id, days } => {
                let assignments = lms.get_assignments(course_id).await?;
                let upcoming = upcoming_assignments(&assignments, days, now);
                Ok(
                    ToolOutput::render("Upcoming Assignments", &assignment_briefs(&upcoming))?
                        .with_item_count(upcoming.len()),
                )
            }
            ToolRequest::GetLateAssignments { course_id } => {
                let assignments = lms.get_assignments(course_id).await?;
                let late = late_assignments(&assignments, now);
                Ok(
                    ToolOutput::render("Late Assignments", &assignment_briefs(&late))?
                        .with_item_count(late.len()),
                )
            }
            ToolRequest::GetAssignmentDetails {
                course_id,
                assignment_id,
            } => {
                let raw = lms.get_assignment(course_id, assignment_id).await?;
                match assignment_details(&raw) {
                    Some(details) => ToolOutput::render("Assignment Details", &details),
                    None => ToolOutput::render(
                        "Assignment Details",
                        &json!({"error": "Assignment not found"}),
                    ),
                }
            }
            ToolRequest::FindAssignment {
                course_id,
                name_pattern,
            } => {
                let assignments = lms.get_assignments(course_id).await?;
                match find_assignment_by_name(&assignments, &name_pattern) {
                    Some(found) => ToolOutput::render("Found Assignment", found),
                    None => Ok(ToolOutput::message(format!(
                        "No assignment found matching '{}' in course {}",
                        name_pattern, course_id
                    ))),
                }
            }
            ToolRequest::GetUserProfile {} => {
                let profile = lms.get_user_profile().await?;
                ToolOutput::render("User Profile", &profile)
            }
            ToolRequest::GetSubmissions {
                course_id,
                assignment_id,
            } => passthrough("Submissions", lms.get_submissions(course_id, assignment_id).await?),
            ToolRequest::GetAnnouncements { course_id } => {
                passthrough("Announcements", lms.get_announcements(course_id).await?)
            }
            ToolRequest::GetCourseFiles { course_id } => {
                passthrough("Course Files", lms.get_files(course_id).await?)
            }
            ToolRequest::GetModules { course_id } => {
                passthrough("Modules", lms.get_modules(course_id).await?)
            }
            ToolRequest::GetModuleItems {
                course_id,
                module_id,
            } => passthrough("Module Items", lms.get_module_items(course_id, module_id).await?),
            ToolRequest::GetGrades { course_id } => {
                passthrough("Grades", lms.get_grades(course_id).await?)
            }
        }
    }
}

fn passthrough(label: &str, value: Value) -> Result<ToolOutput, ToolError> {
    let output = ToolOutput::render(label, &value)?;
    Ok(match value.as_array() {
        Some(items) => output.with_item_count(items.len()),
        None => output,
    })
}
