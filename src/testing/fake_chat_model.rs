use std::sync::{Arc, Mutex};

use crate::domain::{AppError, ToolCall};
use crate::ports::{ChatModel, ChatRequest, ChatResponse};

/// Chat model replaying scripted responses and recording every request.
#[derive(Default)]
pub struct FakeChatModel {
    responses: Mutex<Vec<Result<ChatResponse, AppError>>>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl FakeChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, text: &str) -> Self {
        self.push(Ok(ChatResponse::text(text)));
        self
    }

    pub fn with_tool_call(self, id: &str, name: &str, arguments: &str) -> Self {
        self.push(Ok(ChatResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
            finish_reason: Some("tool_calls".to_string()),
        }));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.push(Err(AppError::chat_api(message, Some(500))));
        self
    }

    fn push(&self, response: Result<ChatResponse, AppError>) {
        self.responses.lock().unwrap().push(response);
    }
}

impl ChatModel for FakeChatModel {
    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(AppError::chat_api("fake: no scripted response left", None));
        }
        responses.remove(0)
    }
}
