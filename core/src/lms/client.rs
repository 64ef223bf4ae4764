use crate::config::Config;
use crate::error::LmsError;
use crate::lms::{Assignment, Course};
use crate::traits::LmsApi;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Canvas proxy backend. Every request carries the
/// institute URL and access token as query parameters and expects a
/// `{success, data | error}` envelope back.
pub struct CanvasClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
    institute_url: String,
}

impl CanvasClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        institute_url: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let institute_url = institute_url.into();
        info!("Canvas client initialized with API URL: {}", api_url);
        info!("Using institute URL: {}", institute_url);

        Self {
            client: reqwest::Client::new(),
            api_url,
            token: token.into(),
            institute_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.canvas_api_url,
            &config.canvas_access_token,
            &config.canvas_institute_url,
        )
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, LmsError> {
        let url = self.endpoint_url(endpoint);
        debug!(
            "Making GET request to {} (institute_url={}, token={}...)",
            url,
            self.institute_url,
            token_preview(&self.token)
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("institute_url", self.institute_url.as_str()),
                ("token", self.token.as_str()),
            ])
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        debug!("Response status: {}", status);

        decode_envelope(status, &body).inspect_err(|e| warn!("{}", e))
    }
}

/// Request URLs carry the access token, so they are stripped from
/// transport errors before those reach logs or the model.
fn transport(err: reqwest::Error) -> LmsError {
    LmsError::Transport(err.without_url())
}

fn token_preview(token: &str) -> String {
    token.chars().take(5).collect()
}

pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, LmsError> {
    if !(200..300).contains(&status) {
        return Err(LmsError::Remote {
            status,
            message: body.to_string(),
        });
    }

    let envelope: Envelope = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(LmsError::Remote {
            status,
            message: envelope
                .error
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let data = envelope
        .data
        .unwrap_or_else(|| Value::Object(Default::default()));
    Ok(serde_json::from_value(data)?)
}

#[async_trait]
impl LmsApi for CanvasClient {
    async fn get_courses(&self) -> Result<Vec<Course>, LmsError> {
        info!("Retrieving list of courses");
        self.get("/courses").await
    }

    async fn get_course(&self, course_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}")).await
    }

    async fn get_assignments(&self, course_id: i64) -> Result<Vec<Assignment>, LmsError> {
        self.get(&format!("/courses/{course_id}/assignments")).await
    }

    async fn get_assignment(&self, course_id: i64, assignment_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}/assignments/{assignment_id}"))
            .await
    }

    async fn get_submissions(
        &self,
        course_id: i64,
        assignment_id: i64,
    ) -> Result<Value, LmsError> {
        self.get(&format!(
            "/courses/{course_id}/assignments/{assignment_id}/submissions"
        ))
        .await
    }

    async fn get_announcements(&self, course_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}/announcements")).await
    }

    async fn get_files(&self, course_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}/files")).await
    }

    async fn get_modules(&self, course_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}/modules")).await
    }

    async fn get_module_items(&self, course_id: i64, module_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}/modules/{module_id}/items"))
            .await
    }

    async fn get_grades(&self, course_id: i64) -> Result<Value, LmsError> {
        self.get(&format!("/courses/{course_id}/grades")).await
    }

    async fn get_user_profile(&self) -> Result<Value, LmsError> {
        self.get("/users/self").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_yields_data() {
        let body = r#"{"success": true, "data": [{"id": 1, "name": "Biology"}]}"#;
        let courses: Vec<Course> = decode_envelope(200, body).unwrap();
        assert_eq!(courses, vec![Course::new(1, "Biology")]);
    }

    #[test]
    fn failed_envelope_is_remote_error() {
        let body = r#"{"success": false, "error": "Invalid token"}"#;
        let err = decode_envelope::<Value>(200, body).unwrap_err();
        match err {
            LmsError::Remote { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Invalid token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failed_envelope_without_message() {
        let err = decode_envelope::<Value>(200, r#"{"success": false}"#).unwrap_err();
        assert_eq!(err.to_string(), "Canvas API error (200): Unknown error");
    }

    #[test]
    fn non_success_status_is_remote_error_with_body() {
        let err = decode_envelope::<Value>(502, "Bad Gateway").unwrap_err();
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "Canvas API error (502): Bad Gateway");
    }

    #[test]
    fn garbage_body_is_transport_class() {
        let err = decode_envelope::<Value>(200, "<html>").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn missing_data_defaults_to_empty_object() {
        let data: Value = decode_envelope(200, r#"{"success": true}"#).unwrap();
        assert_eq!(data, json!({}));
    }

    #[test]
    fn endpoint_url_ignores_trailing_slash() {
        let client = CanvasClient::new("http://localhost:8000/", "token", "https://lms.example");
        assert_eq!(
            client.endpoint_url("/courses/5"),
            "http://localhost:8000/courses/5"
        );
    }

    #[tokio::test]
    async fn transport_errors_never_show_the_token() {
        let client = CanvasClient::new("http://127.0.0.1:9", "SECRET-TOKEN-123", "https://lms.example");
        let err = client.get_courses().await.unwrap_err();

        assert!(err.is_transport());
        assert!(!err.to_string().contains("SECRET-TOKEN-123"));
        assert!(!format!("{err:?}").contains("SECRET-TOKEN-123"));
    }

    #[test]
    fn token_preview_is_short() {
        assert_eq!(token_preview("abcdefghij"), "abcde");
        assert_eq!(token_preview("ab"), "ab");
    }
}
