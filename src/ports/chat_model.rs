//! Hosted chat model port definition.

use serde_json::Value;

use crate::domain::{AppError, ChatMessage, ToolCall};

/// A function tool the model may call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the call arguments.
    pub parameters: Value,
}

/// Request for one model completion.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub temperature: Option<f32>,
}

/// Model output for one completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }
}

/// Port for chat completion calls.
pub trait ChatModel: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
