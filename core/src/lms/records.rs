use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A course as listed by the backend. Only `id` and `name` are read; every
/// other field is carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub submitted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Assignment {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            due_at: None,
            points_possible: None,
            submitted: None,
            extra: Map::new(),
        }
    }

    pub fn with_due_at(mut self, due_at: impl Into<String>) -> Self {
        self.due_at = Some(due_at.into());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points_possible = Some(points);
        self
    }

    pub fn with_submitted(mut self, submitted: bool) -> Self {
        self.submitted = Some(submitted);
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "id": 7,
            "name": "Essay",
            "due_at": null,
            "html_url": "https://lms.example/7",
            "rubric": [{"points": 5}]
        });
        let assignment: Assignment = serde_json::from_value(raw).unwrap();
        assert_eq!(assignment.extra["html_url"], "https://lms.example/7");
        assert!(!assignment.is_submitted());

        let back = serde_json::to_value(&assignment).unwrap();
        assert_eq!(back["rubric"][0]["points"], 5);
    }

    #[test]
    fn null_submitted_flag_reads_as_not_submitted() {
        let assignment: Assignment =
            serde_json::from_value(json!({"id": 1, "submitted": null})).unwrap();
        assert!(!assignment.is_submitted());
        assert_eq!(assignment.name(), "");
    }
}
