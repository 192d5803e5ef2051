mod browser_launcher;
mod chat_model;
mod document_store;
mod page_fetcher;
mod web_search;

pub use browser_launcher::BrowserLauncher;
pub use chat_model::{ChatModel, ChatRequest, ChatResponse, ToolDefinition};
pub use document_store::DocumentStore;
pub use page_fetcher::{FetchedPage, PageFetcher};
pub use web_search::{SearchHit, WebSearch};
