use crate::error::ToolError;
use crate::tools::catalog::{DEFAULT_HORIZON_DAYS, DEFAULT_MAX_COURSES, ToolKind};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// A tool call with its arguments decoded and defaults applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolRequest {
    GetCourses {},
    GetCourseDetails {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
    GetAssignments {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
    GetAssignmentSummary {
        #[serde(default = "default_max_courses")]
        max_courses: usize,
    },
    GetUpcomingAssignments {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
        #[serde(default = "default_horizon_days")]
        days: u32,
    },
    GetLateAssignments {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
    GetAssignmentDetails {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
        #[serde(deserialize_with = "lenient_id")]
        assignment_id: i64,
    },
    FindAssignment {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
        name_pattern: String,
    },
    GetUserProfile {},
    GetSubmissions {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
        #[serde(deserialize_with = "lenient_id")]
        assignment_id: i64,
    },
    GetAnnouncements {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
    GetCourseFiles {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
    GetModules {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
    GetModuleItems {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
        #[serde(deserialize_with = "lenient_id")]
        module_id: i64,
    },
    GetGrades {
        #[serde(deserialize_with = "lenient_id")]
        course_id: i64,
    },
}

/// Ids only ever end up in a URL path, so `"101"` is as good as `101`.
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&text), &"a numeric id")),
    }
}

fn default_max_courses() -> usize {
    DEFAULT_MAX_COURSES
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

impl ToolRequest {
    /// Decode a call from its tool name and raw JSON argument text. An empty
    /// or `null` argument payload counts as no arguments.
    pub fn decode(name: &str, arguments: &str) -> Result<Self, ToolError> {
        if ToolKind::from_name(name).is_none() {
            return Err(ToolError::UnknownTool(name.to_string()));
        }

        let arguments: Value = if arguments.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(arguments).map_err(ToolError::ArgumentDecode)?
        };
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        serde_json::from_value(json!({"name": name, "arguments": arguments}))
            .map_err(ToolError::ArgumentDecode)
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::GetCourses {} => ToolKind::GetCourses,
            ToolRequest::GetCourseDetails { .. } => ToolKind::GetCourseDetails,
            ToolRequest::GetAssignments { .. } => ToolKind::GetAssignments,
            ToolRequest::GetAssignmentSummary { .. } => ToolKind::GetAssignmentSummary,
            ToolRequest::GetUpcomingAssignments { .. } => ToolKind::GetUpcomingAssignments,
            ToolRequest::GetLateAssignments { .. } => ToolKind::GetLateAssignments,
            ToolRequest::GetAssignmentDetails { .. } => ToolKind::GetAssignmentDetails,
            ToolRequest::FindAssignment { .. } => ToolKind::FindAssignment,
            ToolRequest::GetUserProfile {} => ToolKind::GetUserProfile,
            ToolRequest::GetSubmissions { .. } => ToolKind::GetSubmissions,
            ToolRequest::GetAnnouncements { .. } => ToolKind::GetAnnouncements,
            ToolRequest::GetCourseFiles { .. } => ToolKind::GetCourseFiles,
            ToolRequest::GetModules { .. } => ToolKind::GetModules,
            ToolRequest::GetModuleItems { .. } => ToolKind::GetModuleItems,
            ToolRequest::GetGrades { .. } => ToolKind::GetGrades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_entry_decodes_to_its_own_kind() {
        let full = r#"{"course_id": 1, "assignment_id": 2, "module_id": 3, "name_pattern": "x"}"#;
        for kind in ToolKind::ALL {
            let request = ToolRequest::decode(kind.name(), full).unwrap();
            assert_eq!(request.kind(), kind);
        }
    }

    #[test]
    fn defaults_fill_optional_arguments() {
        assert_eq!(
            ToolRequest::decode("get_upcoming_assignments", r#"{"course_id": 101}"#).unwrap(),
            ToolRequest::GetUpcomingAssignments {
                course_id: 101,
                days: 14
            }
        );
        assert_eq!(
            ToolRequest::decode("get_assignment_summary", "").unwrap(),
            ToolRequest::GetAssignmentSummary { max_courses: 5 }
        );
        assert_eq!(
            ToolRequest::decode("get_courses", "null").unwrap(),
            ToolRequest::GetCourses {}
        );
    }

    #[test]
    fn missing_required_argument_is_decode_error() {
        let err = ToolRequest::decode("get_assignments", "{}").unwrap_err();
        assert!(matches!(err, ToolError::ArgumentDecode(_)));
    }

    #[test]
    fn quoted_ids_are_accepted() {
        assert_eq!(
            ToolRequest::decode(
                "get_assignment_details",
                r#"{"course_id": "101", "assignment_id": " 7 "}"#
            )
            .unwrap(),
            ToolRequest::GetAssignmentDetails {
                course_id: 101,
                assignment_id: 7
            }
        );

        let err = ToolRequest::decode("get_assignments", r#"{"course_id": "biology"}"#).unwrap_err();
        assert!(matches!(err, ToolError::ArgumentDecode(_)));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = ToolRequest::decode("get_assignments", "{\"course_id\": ").unwrap_err();
        assert!(matches!(err, ToolError::ArgumentDecode(_)));
    }

    #[test]
    fn unknown_name_is_rejected_before_decoding() {
        let err = ToolRequest::decode("drop_course", "{}").unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "drop_course"));
    }
}
