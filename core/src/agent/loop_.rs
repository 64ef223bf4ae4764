use crate::agent::history::{ConversationHistory, ConversationTurn, DEFAULT_MAX_HISTORY};
use crate::agent::{ContextBuilder, ToolOutcome, ToolRegistry};
use crate::providers::{ModelGateway, ModelReply};
use crate::traits::{Provider, ToolInvocation};
use futures_util::FutureExt;
use futures_util::future::join_all;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A list-typed tool result longer than this makes the final answer of the
/// cycle use the concise prompt.
pub const LARGE_RESULT_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    AwaitingModel,
    DispatchingTools,
    AwaitingFinalModel,
}

/// One conversation session. Owns its history exclusively; `process` takes
/// `&mut self`, so cycles on the same session cannot overlap.
pub struct AgentLoop {
    gateway: ModelGateway,
    context_builder: ContextBuilder,
    tool_registry: Arc<ToolRegistry>,
    history: ConversationHistory,
    state: LoopState,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        context_builder: ContextBuilder,
        tool_registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            gateway: ModelGateway::new(provider),
            context_builder,
            tool_registry,
            history: ConversationHistory::new(DEFAULT_MAX_HISTORY),
            state: LoopState::Idle,
        }
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.history = ConversationHistory::new(max);
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn reset(&mut self) {
        debug!("Resetting conversation context");
        self.history.clear();
    }

    /// Run one full cycle for a user message and return the answer. Always
    /// yields text: tool and model failures are folded into the reply, and a
    /// panic inside the cycle becomes a generic error message.
    pub async fn process(&mut self, message: &str) -> String {
        match AssertUnwindSafe(self.run_cycle(message))
            .catch_unwind()
            .await
        {
            Ok(text) => text,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                error!("Error processing message: {}", detail);
                self.state = LoopState::Idle;
                format!(
                    "I'm sorry, I encountered an error while processing your message: {}",
                    detail
                )
            }
        }
    }

    async fn run_cycle(&mut self, message: &str) -> String {
        debug!("Processing user message: {}", message);
        self.history.push(ConversationTurn::user(message));
        self.transition(LoopState::AwaitingModel);

        let system_prompt = self.context_builder.build_system_prompt(false);
        let reply = self
            .gateway
            .respond_with_tools(
                &system_prompt,
                self.history.turns(),
                self.tool_registry.get_specs(),
            )
            .await;

        let text = match reply {
            ModelReply::Text(text) => text,
            ModelReply::ToolCalls(invocations) => {
                self.transition(LoopState::DispatchingTools);
                let large = self.dispatch_tools(&invocations).await;

                self.transition(LoopState::AwaitingFinalModel);
                let system_prompt = self.context_builder.build_system_prompt(large);
                self.gateway
                    .respond(&system_prompt, self.history.turns())
                    .await
            }
        };

        self.history.push(ConversationTurn::assistant(text.clone()));
        self.transition(LoopState::Idle);
        text
    }

    /// Runs every invocation concurrently, then appends the outcomes in the
    /// order they were requested. Returns whether any result was large.
    async fn dispatch_tools(&mut self, invocations: &[ToolInvocation]) -> bool {
        info!("Dispatching {} tool call(s)", invocations.len());
        let registry = Arc::clone(&self.tool_registry);
        let outcomes = join_all(invocations.iter().map(|inv| registry.dispatch(inv))).await;

        let mut errors = Vec::new();
        let mut large = false;

        for outcome in outcomes {
            match outcome {
                ToolOutcome::Success { name, output } => {
                    if output
                        .item_count
                        .is_some_and(|n| n > LARGE_RESULT_THRESHOLD)
                    {
                        large = true;
                    }
                    self.history
                        .push(ConversationTurn::tool_result(name, output.text));
                }
                ToolOutcome::Failure(err) => errors.push(err.to_string()),
            }
        }

        if !errors.is_empty() {
            warn!("{} of {} tool call(s) failed", errors.len(), invocations.len());
            self.history.push(ConversationTurn::error_report(format!(
                "Errors encountered:\n{}",
                errors.join("\n")
            )));
        }

        large
    }

    fn transition(&mut self, next: LoopState) {
        debug!("Agent state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal failure".to_string()
    }
}
