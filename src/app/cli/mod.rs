//! CLI Adapter.

mod chat;
mod jobs;
mod serve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app::api;
use crate::app::config::DEFAULT_CONFIG_FILE;
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "career-coach")]
#[command(version)]
#[command(
    about = "Personal career coach grounded in your own documents, with ATS job search",
    long_about = None
)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the browser chat interface
    #[clap(visible_alias = "s")]
    Serve {
        /// Address to bind (defaults to interface.server_name)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (defaults to interface.server_port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Chat with the coach in the terminal
    #[clap(visible_alias = "c")]
    Chat,
    /// Ask a single question and print the answer
    #[clap(visible_alias = "a")]
    Ask {
        /// The question to ask
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Print the assembled system prompt
    Prompt,
    /// List the documents loaded from the data directory
    #[clap(visible_alias = "docs")]
    Documents,
    /// Show the document passages retrieved for a query
    Context {
        /// Search query
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Search ATS job boards
    #[clap(visible_alias = "j")]
    Jobs {
        #[command(subcommand)]
        command: jobs::JobsCommands,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    let config_path = cli.config.as_path();

    let result: Result<(), AppError> = match cli.command {
        Commands::Serve { host, port } => serve::run_serve(config_path, host, port),
        Commands::Chat => chat::run_chat(config_path),
        Commands::Ask { message } => run_ask(config_path, &message.join(" ")),
        Commands::Prompt => run_prompt(config_path),
        Commands::Documents => run_documents(config_path),
        Commands::Context { query } => run_context(config_path, &query.join(" ")),
        Commands::Jobs { command } => jobs::run_jobs(config_path, command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_ask(config_path: &Path, message: &str) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let ctx = Arc::new(api::create_context(config)?);
    let agent = api::create_agent(ctx)?;
    println!("{}", agent.respond(&[], message)?);
    Ok(())
}

fn run_prompt(config_path: &Path) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let ctx = api::create_context(config)?;
    println!("{}", api::system_prompt(&ctx)?);
    Ok(())
}

fn run_documents(config_path: &Path) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let data_dir = config.user.data_directory.clone();
    let ctx = api::create_context(config)?;
    let documents = api::documents(&ctx);

    if documents.is_empty() {
        println!("No documents found in {}", data_dir.display());
        return Ok(());
    }

    println!("Loaded {} document(s) from {}:", documents.len(), data_dir.display());
    for doc in documents {
        println!("  {} ({}, {} chars)", doc.name, doc.kind, doc.chars);
    }
    Ok(())
}

fn run_context(config_path: &Path, query: &str) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let ctx = api::create_context(config)?;
    println!("{}", api::context(&ctx, query));
    Ok(())
}
