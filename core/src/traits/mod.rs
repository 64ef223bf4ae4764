pub mod lms;
pub mod provider;
pub mod tool;

pub use lms::LmsApi;
pub use provider::{ChatMessage, ChatRequest, ChatResponse, Provider, ToolInvocation};
pub use tool::ToolSpec;
