//! Job search commands.

use std::path::Path;

use clap::{Args, Subcommand};

use crate::app::api::{self, JobSearchOptions};
use crate::domain::{AppError, SearchBackend};

#[derive(Subcommand)]
pub enum JobsCommands {
    /// Open Google site searches for each ATS domain in the browser
    #[clap(visible_alias = "o")]
    Open(JobSearchArgs),
    /// Print the search URLs without opening them
    #[clap(visible_alias = "p")]
    Preview(JobSearchArgs),
    /// Search the web and list validated job postings
    #[clap(visible_alias = "s")]
    Scrape(JobSearchArgs),
}

#[derive(Args)]
pub struct JobSearchArgs {
    /// Job title, e.g. "Senior Software Engineer"
    #[arg(short, long)]
    title: String,
    /// Boolean filter: && (and), || (or), leading - (not), parentheses
    #[arg(short, long)]
    expression: Option<String>,
    /// Query syntax: google, bing, or yahoo
    #[arg(short, long)]
    backend: Option<SearchBackend>,
    /// Maximum domains to open or postings to return
    #[arg(short, long, value_parser = parse_limit)]
    limit: Option<usize>,
    /// Keep at most one posting per company
    #[arg(long)]
    one_per_company: bool,
}

impl From<JobSearchArgs> for JobSearchOptions {
    fn from(args: JobSearchArgs) -> Self {
        JobSearchOptions {
            title: args.title,
            expression: args.expression,
            backend: args.backend,
            limit: args.limit,
            one_per_company: args.one_per_company,
        }
    }
}

fn parse_limit(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(e) => Err(e.to_string()),
    }
}

pub fn run_jobs(config_path: &Path, command: JobsCommands) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let ctx = api::create_context(config)?;

    let output = match command {
        JobsCommands::Open(args) => api::jobs_open(&ctx, &args.into())?,
        JobsCommands::Preview(args) => api::jobs_preview(&ctx, &args.into())?,
        JobsCommands::Scrape(args) => api::jobs_scrape(&ctx, &args.into())?,
    };
    println!("{}", output);
    Ok(())
}
