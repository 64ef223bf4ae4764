use crate::error::LmsError;
use crate::lms::{Assignment, Course};
use async_trait::async_trait;
use serde_json::Value;

/// Read access to the learning-management backend.
///
/// Entity payloads the assistant never inspects are returned as raw JSON and
/// forwarded untouched.
#[async_trait]
pub trait LmsApi: Send + Sync {
    async fn get_courses(&self) -> Result<Vec<Course>, LmsError>;

    async fn get_course(&self, course_id: i64) -> Result<Value, LmsError>;

    async fn get_assignments(&self, course_id: i64) -> Result<Vec<Assignment>, LmsError>;

    async fn get_assignment(&self, course_id: i64, assignment_id: i64) -> Result<Value, LmsError>;

    async fn get_submissions(&self, course_id: i64, assignment_id: i64)
    -> Result<Value, LmsError>;

    async fn get_announcements(&self, course_id: i64) -> Result<Value, LmsError>;

    async fn get_files(&self, course_id: i64) -> Result<Value, LmsError>;

    async fn get_modules(&self, course_id: i64) -> Result<Value, LmsError>;

    async fn get_module_items(&self, course_id: i64, module_id: i64) -> Result<Value, LmsError>;

    async fn get_grades(&self, course_id: i64) -> Result<Value, LmsError>;

    async fn get_user_profile(&self) -> Result<Value, LmsError>;
}
