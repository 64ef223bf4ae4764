//! Error types shared across the assistant.
//!
//! Adapter failures split into a transport class (the backend could not be
//! reached or answered garbage) and a remote class (the backend answered and
//! reported a failure). Tool failures wrap either, tagged with the tool name.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmsError {
    #[error("Network error when connecting to Canvas API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response from Canvas API: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Canvas API error ({status}): {message}")]
    Remote { status: u16, message: String },
}

impl LmsError {
    /// Whether the failure happened before the backend could answer
    /// meaningfully. Transport failures are candidates for a retry, remote
    /// ones are not.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::MalformedBody(_))
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    ArgumentDecode(#[source] serde_json::Error),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error(transparent)]
    Lms(#[from] LmsError),

    #[error("failed to render result: {0}")]
    Render(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("Error executing {tool}: {source}")]
pub struct ToolDispatchError {
    pub tool: String,
    #[source]
    pub source: ToolError,
}

impl ToolDispatchError {
    pub fn new(tool: impl Into<String>, source: ToolError) -> Self {
        Self {
            tool: tool.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
