use crate::traits::ToolSpec;
use serde_json::{Value, json};

pub const DEFAULT_MAX_COURSES: usize = 5;
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Every tool the model may call. The catalog sent to the model and the
/// dispatcher are both driven by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetCourses,
    GetCourseDetails,
    GetAssignments,
    GetAssignmentSummary,
    GetUpcomingAssignments,
    GetLateAssignments,
    GetAssignmentDetails,
    FindAssignment,
    GetUserProfile,
    GetSubmissions,
    GetAnnouncements,
    GetCourseFiles,
    GetModules,
    GetModuleItems,
    GetGrades,
}

impl ToolKind {
    pub const ALL: [ToolKind; 15] = [
        ToolKind::GetCourses,
        ToolKind::GetCourseDetails,
        ToolKind::GetAssignments,
        ToolKind::GetAssignmentSummary,
        ToolKind::GetUpcomingAssignments,
        ToolKind::GetLateAssignments,
        ToolKind::GetAssignmentDetails,
        ToolKind::FindAssignment,
        ToolKind::GetUserProfile,
        ToolKind::GetSubmissions,
        ToolKind::GetAnnouncements,
        ToolKind::GetCourseFiles,
        ToolKind::GetModules,
        ToolKind::GetModuleItems,
        ToolKind::GetGrades,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetCourses => "get_courses",
            ToolKind::GetCourseDetails => "get_course_details",
            ToolKind::GetAssignments => "get_assignments",
            ToolKind::GetAssignmentSummary => "get_assignment_summary",
            ToolKind::GetUpcomingAssignments => "get_upcoming_assignments",
            ToolKind::GetLateAssignments => "get_late_assignments",
            ToolKind::GetAssignmentDetails => "get_assignment_details",
            ToolKind::FindAssignment => "find_assignment",
            ToolKind::GetUserProfile => "get_user_profile",
            ToolKind::GetSubmissions => "get_submissions",
            ToolKind::GetAnnouncements => "get_announcements",
            ToolKind::GetCourseFiles => "get_course_files",
            ToolKind::GetModules => "get_modules",
            ToolKind::GetModuleItems => "get_module_items",
            ToolKind::GetGrades => "get_grades",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        ToolKind::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::GetCourses => "Get a list of courses the user is enrolled in",
            ToolKind::GetCourseDetails => "Get detailed information about a specific course",
            ToolKind::GetAssignments => "Get assignments for a specific course",
            ToolKind::GetAssignmentSummary => {
                "Get a summary of important assignments (late and upcoming) across all courses"
            }
            ToolKind::GetUpcomingAssignments => {
                "Get assignments that are due in the next X days for a course"
            }
            ToolKind::GetLateAssignments => {
                "Get assignments that are past due and not submitted for a course"
            }
            ToolKind::GetAssignmentDetails => {
                "Get comprehensive details about a specific assignment, including instructions, files, and submission requirements"
            }
            ToolKind::FindAssignment => "Find an assignment by name or keyword in a specific course",
            ToolKind::GetUserProfile => "Get the current user's profile information",
            ToolKind::GetSubmissions => "Get the submissions made for a specific assignment",
            ToolKind::GetAnnouncements => "Get announcements posted in a course",
            ToolKind::GetCourseFiles => "Get files shared in a course",
            ToolKind::GetModules => "Get the modules that organize a course",
            ToolKind::GetModuleItems => "Get the items inside a course module",
            ToolKind::GetGrades => "Get the user's grades for a course",
        }
    }

    pub fn parameters_schema(self) -> Value {
        let course_id = json!({"type": "integer", "description": "The ID of the course"});
        let assignment_id = json!({"type": "integer", "description": "The ID of the assignment"});

        match self {
            ToolKind::GetCourses | ToolKind::GetUserProfile => object(json!({}), &[]),
            ToolKind::GetCourseDetails => object(
                json!({"course_id": {"type": "integer", "description": "The ID of the course to retrieve"}}),
                &["course_id"],
            ),
            ToolKind::GetAssignments => object(
                json!({"course_id": {"type": "integer", "description": "The ID of the course to retrieve assignments for"}}),
                &["course_id"],
            ),
            ToolKind::GetAssignmentSummary => object(
                json!({"max_courses": {
                    "type": "integer",
                    "description": format!("Maximum number of courses to check (default: {DEFAULT_MAX_COURSES})"),
                    "default": DEFAULT_MAX_COURSES
                }}),
                &[],
            ),
            ToolKind::GetUpcomingAssignments => object(
                json!({
                    "course_id": course_id,
                    "days": {
                        "type": "integer",
                        "description": format!("Number of days to look ahead (default: {DEFAULT_HORIZON_DAYS})"),
                        "default": DEFAULT_HORIZON_DAYS
                    }
                }),
                &["course_id"],
            ),
            ToolKind::GetLateAssignments
            | ToolKind::GetAnnouncements
            | ToolKind::GetCourseFiles
            | ToolKind::GetModules
            | ToolKind::GetGrades => object(json!({"course_id": course_id}), &["course_id"]),
            ToolKind::GetAssignmentDetails | ToolKind::GetSubmissions => object(
                json!({"course_id": course_id, "assignment_id": assignment_id}),
                &["course_id", "assignment_id"],
            ),
            ToolKind::FindAssignment => object(
                json!({
                    "course_id": course_id,
                    "name_pattern": {
                        "type": "string",
                        "description": "Full or partial name of the assignment to find (case insensitive)"
                    }
                }),
                &["course_id", "name_pattern"],
            ),
            ToolKind::GetModuleItems => object(
                json!({
                    "course_id": course_id,
                    "module_id": {"type": "integer", "description": "The ID of the module"}
                }),
                &["course_id", "module_id"],
            ),
        }
    }

    pub fn spec(self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters_schema: self.parameters_schema(),
        }
    }
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn tool_catalog() -> Vec<ToolSpec> {
    ToolKind::ALL.into_iter().map(ToolKind::spec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<_> = ToolKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), ToolKind::ALL.len());

        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_course"), None);
    }

    #[test]
    fn required_parameters_are_declared_properties() {
        for spec in tool_catalog() {
            let schema = &spec.parameters_schema;
            assert_eq!(schema["type"], "object", "{}", spec.name);
            let properties = schema["properties"].as_object().unwrap();
            for required in schema["required"].as_array().unwrap() {
                let key = required.as_str().unwrap();
                assert!(properties.contains_key(key), "{} requires {}", spec.name, key);
            }
        }
    }

    #[test]
    fn upcoming_schema_carries_default_horizon() {
        let schema = ToolKind::GetUpcomingAssignments.parameters_schema();
        assert_eq!(schema["properties"]["days"]["default"], 14);
        assert_eq!(schema["required"], json!(["course_id"]));
    }
}
