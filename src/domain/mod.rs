pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod expression;
pub mod job_posting;
pub mod prompt;

pub use config::{
    AgentConfig, DocumentConfig, InterfaceConfig, JobSearchConfig, LogFormat, LoggingConfig,
    SystemConfig, UserConfig,
};
pub use conversation::{ChatMessage, HistoryEntry, Role, ToolCall, bounded_history};
pub use document::{Document, DocumentKind, assemble_context, retrieve_context};
pub use error::AppError;
pub use expression::{QueryParts, SearchBackend, compile_query, parse_expression};
pub use job_posting::PostingVerdict;
pub use prompt::{PromptContext, TemplateRenderer, build_system_prompt};
