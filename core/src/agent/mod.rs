pub mod context;
pub mod history;
pub mod loop_;
pub mod registry;

pub use context::ContextBuilder;
pub use history::{ConversationHistory, ConversationTurn, TurnRole};
pub use loop_::{AgentLoop, LoopState};
pub use registry::{ToolOutcome, ToolRegistry};
