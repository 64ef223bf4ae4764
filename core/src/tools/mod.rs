pub mod catalog;
pub mod request;
pub mod shaping;

pub use catalog::{DEFAULT_HORIZON_DAYS, DEFAULT_MAX_COURSES, ToolKind, tool_catalog};
pub use request::ToolRequest;
pub use shaping::{ASSIGNMENT_LIST_LIMIT, ToolOutput};
