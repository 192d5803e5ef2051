//! API facade for the application.
//!
//! Glues configuration, concrete adapters, and command execution together.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::browser_command::SystemBrowser;
use crate::adapters::chat_model_retrying::{RetryPolicy, RetryingChatModel};
use crate::adapters::document_filesystem::FilesystemDocumentStore;
use crate::adapters::duckduckgo_search::DuckDuckGoSearch;
use crate::adapters::openai_http::HttpChatModel;
use crate::adapters::page_fetcher_http::HttpPageFetcher;
use crate::adapters::template::MinijinjaTemplateRenderer;
use crate::app::agent::{self, CoachAgent};
use crate::app::commands::job_search;
use crate::app::{AppContext, config};
use crate::domain::{DocumentKind, SystemConfig, retrieve_context};
use crate::ports::DocumentStore;

pub use crate::app::commands::job_search::JobSearchOptions;
pub use crate::domain::AppError;

/// Name, format, and size of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub name: String,
    pub kind: DocumentKind,
    pub chars: usize,
}

/// Load the config at `path` and install logging from it.
pub fn load(path: &Path) -> Result<SystemConfig, AppError> {
    config::load_dotenv();
    let config = config::load_config(path)?;
    crate::app::logging::init(&config.logging);
    Ok(config)
}

/// Create an `AppContext` backed by the filesystem and live web adapters.
pub fn create_context(config: SystemConfig) -> Result<AppContext, AppError> {
    let store =
        FilesystemDocumentStore::new(config.user.data_directory.clone(), config.documents.clone());
    let documents = store.load_documents()?;

    let timeout = config.job_search.timeout;
    let search = DuckDuckGoSearch::with_default_endpoint(timeout)?;
    let fetcher = HttpPageFetcher::new(timeout)?;

    Ok(AppContext::new(
        config,
        documents,
        Box::new(search),
        Box::new(fetcher),
        Box::new(SystemBrowser::new()),
    ))
}

/// Build the coach agent with the hosted model behind a retry wrapper.
pub fn create_agent(ctx: Arc<AppContext>) -> Result<CoachAgent, AppError> {
    let system_prompt = agent::load_system_prompt(&ctx, &MinijinjaTemplateRenderer::new())?;
    let http = HttpChatModel::from_config(ctx.config())?;
    let model = RetryingChatModel::new(Box::new(http), RetryPolicy::from_config(&ctx.config().agent));
    CoachAgent::new(ctx, Box::new(model), system_prompt)
}

/// The assembled system prompt, without contacting the model.
pub fn system_prompt(ctx: &AppContext) -> Result<String, AppError> {
    agent::load_system_prompt(ctx, &MinijinjaTemplateRenderer::new())
}

pub fn documents(ctx: &AppContext) -> Vec<DocumentSummary> {
    ctx.documents()
        .iter()
        .map(|doc| DocumentSummary { name: doc.name.clone(), kind: doc.kind, chars: doc.char_count() })
        .collect()
}

/// Keyword retrieval over the loaded documents.
pub fn context(ctx: &AppContext, query: &str) -> String {
    let docs = &ctx.config().documents;
    retrieve_context(query, ctx.documents(), docs.chunk_size, docs.chunk_overlap, docs.max_results)
}

pub fn jobs_open(ctx: &AppContext, options: &JobSearchOptions) -> Result<String, AppError> {
    job_search::open_in_browser(ctx, options)
}

pub fn jobs_preview(ctx: &AppContext, options: &JobSearchOptions) -> Result<String, AppError> {
    job_search::preview(ctx, options)
}

pub fn jobs_scrape(ctx: &AppContext, options: &JobSearchOptions) -> Result<String, AppError> {
    job_search::scrape(ctx, options)
}
