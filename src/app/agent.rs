//! The career coach agent: system prompt, tool loop, and error mapping.

use std::fs;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::app::{AppContext, tools};
use crate::domain::{
    AppError, ChatMessage, HistoryEntry, PromptContext, TemplateRenderer, assemble_context,
    bounded_history, build_system_prompt,
};
use crate::ports::{ChatModel, ChatRequest, ToolDefinition};

pub const APOLOGY_PREFIX: &str = "I apologize, but I encountered an error: ";
const GENERIC_FAILURE: &str = "something went wrong while preparing a reply. Please try again.";

/// Read the instructions template and build the full system prompt.
pub fn load_system_prompt(
    ctx: &AppContext,
    renderer: &dyn TemplateRenderer,
) -> Result<String, AppError> {
    let path = &ctx.config().agent.instructions_template;
    let template = fs::read_to_string(path)
        .map_err(|_| AppError::TemplateNotFound(path.display().to_string()))?;
    let template_name =
        path.file_name().and_then(|n| n.to_str()).unwrap_or("instructions").to_string();
    render_system_prompt(ctx, &template, &template_name, renderer)
}

/// Render `template` with the user's variables and append every loaded document.
pub fn render_system_prompt(
    ctx: &AppContext,
    template: &str,
    template_name: &str,
    renderer: &dyn TemplateRenderer,
) -> Result<String, AppError> {
    let config = ctx.config();
    let variables = PromptContext::new()
        .with_var("name", config.user.name.as_str())
        .with_var("current_date", config.user.current_date.as_str())
        .with_var("agent_name", config.agent.name.as_str());
    let documents = assemble_context(ctx.documents());
    build_system_prompt(renderer, template, template_name, &variables, &documents)
}

/// Chat agent holding the prompt built at startup.
pub struct CoachAgent {
    context: Arc<AppContext>,
    model: Box<dyn ChatModel>,
    system_prompt: String,
    tools: Vec<ToolDefinition>,
}

impl CoachAgent {
    pub fn new(
        context: Arc<AppContext>,
        model: Box<dyn ChatModel>,
        system_prompt: String,
    ) -> Result<Self, AppError> {
        let tools = tools::definitions(&context.config().agent.tools)?;
        info!(
            agent = %context.config().agent.name,
            model = %context.config().agent.model,
            documents = context.documents().len(),
            prompt_chars = system_prompt.chars().count(),
            tools = tools.len(),
            "coach agent ready"
        );
        Ok(Self { context, model, system_prompt, tools })
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Answer `message` given prior UI turns, running requested tools in between.
    pub fn respond(&self, history: &[HistoryEntry], message: &str) -> Result<String, AppError> {
        let agent = &self.context.config().agent;

        let mut messages = vec![ChatMessage::system(self.system_prompt.as_str())];
        messages.extend(bounded_history(history, agent.max_history_messages));
        messages.push(ChatMessage::user(message));

        for turn in 1..=agent.max_turns {
            let request = ChatRequest {
                model: agent.model.clone(),
                messages: messages.clone(),
                tools: self.tools.clone(),
                temperature: agent.temperature,
            };
            let response = self.model.complete(&request)?;

            if response.tool_calls.is_empty() {
                debug!(turn, "model returned final answer");
                return Ok(response.content.unwrap_or_default());
            }

            debug!(turn, calls = response.tool_calls.len(), "model requested tools");
            let calls = response.tool_calls;
            messages.push(ChatMessage::assistant_tool_calls(
                response.content.unwrap_or_default(),
                calls.clone(),
            ));
            for call in &calls {
                let output = tools::execute(&self.context, call);
                messages.push(ChatMessage::tool_result(call.id.as_str(), output));
            }
        }

        Err(AppError::MaxTurnsExceeded(agent.max_turns))
    }

    /// `respond`, with failures turned into a message for the user.
    pub fn chat_reply(&self, history: &[HistoryEntry], message: &str) -> String {
        match self.respond(history, message) {
            Ok(reply) => reply,
            Err(err) => {
                error!("chat error: {}", err);
                apology(&err, self.context.config().interface.show_error)
            }
        }
    }
}

/// User-facing text for a failed reply.
pub fn apology(err: &AppError, show_error: bool) -> String {
    if show_error {
        format!("{}Error: {}", APOLOGY_PREFIX, err)
    } else {
        format!("{}{}", APOLOGY_PREFIX, GENERIC_FAILURE)
    }
}
