//! career-coach: a personal career coaching chatbot grounded in your own documents,
//! with ATS job search driven by a small boolean expression language.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    DocumentSummary, JobSearchOptions, context, create_agent, create_context, documents,
    jobs_open, jobs_preview, jobs_scrape, load, system_prompt,
};
pub use domain::AppError;
