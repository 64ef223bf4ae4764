pub mod agent;
pub mod config;
pub mod error;
pub mod lms;
pub mod providers;
pub mod tools;
pub mod traits;

pub use agent::{AgentLoop, ContextBuilder, ToolRegistry};
pub use config::Config;
pub use error::{ConfigError, LmsError, ToolDispatchError, ToolError};
pub use lms::CanvasClient;
pub use providers::{ModelGateway, OpenAIProvider};
pub use traits::*;
