//! Conversation messages exchanged with the hosted model.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments as sent by the model.
    pub arguments: String,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    /// Set on `Role::Tool` messages to link the result to its call.
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), tool_calls: Vec::new(), tool_call_id: None }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn assistant_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self { tool_calls, ..Self::plain(Role::Assistant, content) }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self { tool_call_id: Some(tool_call_id.into()), ..Self::plain(Role::Tool, content) }
    }
}

/// A user or assistant turn as shown in a chat UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Keep the most recent `max_messages` user and assistant turns.
///
/// System and tool entries supplied by a client are dropped; the system prompt is
/// always owned by the agent.
pub fn bounded_history(history: &[HistoryEntry], max_messages: usize) -> Vec<ChatMessage> {
    let turns: Vec<&HistoryEntry> = history
        .iter()
        .filter(|entry| matches!(entry.role, Role::User | Role::Assistant))
        .filter(|entry| !entry.content.trim().is_empty())
        .collect();

    let skip = turns.len().saturating_sub(max_messages);
    turns
        .into_iter()
        .skip(skip)
        .map(|entry| match entry.role {
            Role::User => ChatMessage::user(entry.content.clone()),
            _ => ChatMessage::assistant(entry.content.clone()),
        })
        .collect()
}
