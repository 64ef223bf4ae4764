use crate::agent::history::{ConversationTurn, TurnRole};
use crate::traits::{ChatMessage, ChatRequest, Provider, ToolInvocation, ToolSpec};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    /// Always non-empty.
    ToolCalls(Vec<ToolInvocation>),
}

/// Single round trip to the model per call, no retries. Provider failures
/// come back as an apology so callers always have text to show.
pub struct ModelGateway {
    provider: Arc<dyn Provider>,
}

impl ModelGateway {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn respond(&self, system_prompt: &str, history: &[ConversationTurn]) -> String {
        let messages = build_messages(system_prompt, history);
        debug!("Generating response with {} messages", messages.len());

        let request = ChatRequest {
            messages: &messages,
            tools: None,
        };

        match self.provider.chat(request).await {
            Ok(response) => response.text_or_empty().to_string(),
            Err(e) => {
                error!("Error calling model API: {}", e);
                apology(&e)
            }
        }
    }

    pub async fn respond_with_tools(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        tools: &[ToolSpec],
    ) -> ModelReply {
        let messages = build_messages(system_prompt, history);
        debug!(
            "Generating response with tools ({} tools available)",
            tools.len()
        );

        let request = ChatRequest {
            messages: &messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        match self.provider.chat(request).await {
            Ok(response) if response.has_tool_calls() => {
                debug!("Model requested {} tool call(s)", response.tool_calls.len());
                ModelReply::ToolCalls(response.tool_calls)
            }
            Ok(response) => ModelReply::Text(response.text_or_empty().to_string()),
            Err(e) => {
                error!("Error calling model API with tools: {}", e);
                ModelReply::Text(apology(&e))
            }
        }
    }
}

fn apology(err: &anyhow::Error) -> String {
    format!("I'm sorry, I encountered an error: {}", err)
}

pub fn build_messages(system_prompt: &str, history: &[ConversationTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.iter().map(to_chat_message));
    messages
}

fn to_chat_message(turn: &ConversationTurn) -> ChatMessage {
    match turn.role {
        TurnRole::User => ChatMessage::user(&turn.content),
        TurnRole::Assistant => ChatMessage::assistant(&turn.content),
        TurnRole::ToolResult | TurnRole::ErrorReport => ChatMessage::function(
            turn.name.as_deref().unwrap_or("tool"),
            &turn.content,
        ),
    }
}
