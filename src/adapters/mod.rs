pub mod browser_command;
pub mod chat_model_retrying;
pub mod document_filesystem;
pub mod duckduckgo_search;
pub mod openai_http;
pub mod page_fetcher_http;
pub mod template;
