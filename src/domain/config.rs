//! System configuration domain models.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

use crate::domain::AppError;
use crate::domain::expression::SearchBackend;

/// Default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Environment variable consulted when `openai_api_key` is absent.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Master configuration loaded from `config.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    pub user: UserConfig,
    pub agent: AgentConfig,
    #[serde(default)]
    pub job_search: JobSearchConfig,
    #[serde(default)]
    pub documents: DocumentConfig,
    #[serde(default)]
    pub interface: InterfaceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

/// User-specific configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub name: String,
    pub data_directory: PathBuf,
    /// Human-readable date captured when the config was loaded.
    #[serde(skip, default = "today")]
    pub current_date: String,
}

/// Core agent configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub model: String,
    pub instructions_template: PathBuf,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Names of function tools the model may call.
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Job search tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchConfig {
    #[serde(default)]
    pub default_backend: SearchBackend,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
    /// Page fetch timeout in seconds.
    #[serde(default = "default_search_timeout")]
    pub timeout: u64,
    #[serde(default = "default_max_results_per_domain")]
    pub max_results_per_domain: usize,
}

impl Default for JobSearchConfig {
    fn default() -> Self {
        Self {
            default_backend: SearchBackend::default(),
            default_limit: default_limit(),
            domains: default_domains(),
            timeout: default_search_timeout(),
            max_results_per_domain: default_max_results_per_domain(),
        }
    }
}

/// Document processing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_extensions")]
    pub supported_extensions: Vec<String>,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// Number of chunks returned by context retrieval.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            supported_extensions: default_extensions(),
            encoding: default_encoding(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            max_file_size_mb: default_max_file_size_mb(),
            max_results: default_max_results(),
        }
    }
}

impl DocumentConfig {
    /// Whether a file extension (with or without leading dot) is accepted.
    pub fn supports_extension(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
        self.supported_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(&wanted))
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Web chat interface configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_server_name")]
    pub server_name: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_true")]
    pub show_error: bool,
    #[serde(default = "default_chatbot_height")]
    pub chatbot_height: u32,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            server_name: default_server_name(),
            server_port: default_server_port(),
            show_error: default_true(),
            chatbot_height: default_chatbot_height(),
            examples: Vec::new(),
        }
    }
}

/// Log output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    #[default]
    Compact,
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Silence HTTP client internals below `warn`.
    #[serde(default = "default_true")]
    pub disable_httpx_noise: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            disable_httpx_noise: default_true(),
        }
    }
}

impl SystemConfig {
    /// Parse configuration from YAML, substituting `${VAR}` references via `lookup`.
    pub fn from_yaml_str<F>(content: &str, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: Value = serde_yaml::from_str(content)?;
        let substituted = substitute_env_vars(raw, &lookup);
        let mut config: SystemConfig = serde_yaml::from_value(substituted)?;

        if config.openai_api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            config.openai_api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve relative paths against the directory holding the config file.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        if self.user.data_directory.is_relative() {
            self.user.data_directory = base_dir.join(&self.user.data_directory);
        }
        if self.agent.instructions_template.is_relative() {
            self.agent.instructions_template = base_dir.join(&self.agent.instructions_template);
        }
    }

    /// Interface description followed by today's date.
    pub fn full_description(&self) -> String {
        format!("{}\n\n**Today is {}**", self.interface.description.trim(), self.user.current_date)
    }

    /// API key for the hosted model, if one was configured.
    pub fn api_key(&self) -> Result<&str, AppError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| AppError::EnvironmentVariableMissing(API_KEY_ENV.to_string()))
    }

    fn validate(&self) -> Result<(), AppError> {
        let docs = &self.documents;
        if docs.chunk_size == 0 {
            return Err(AppError::config_error("documents.chunk_size must be greater than 0"));
        }
        if docs.chunk_overlap >= docs.chunk_size {
            return Err(AppError::config_error(format!(
                "documents.chunk_overlap ({}) must be smaller than documents.chunk_size ({})",
                docs.chunk_overlap, docs.chunk_size
            )));
        }
        let encoding = docs.encoding.to_ascii_lowercase().replace(['-', '_'], "");
        if encoding != "utf8" {
            return Err(AppError::config_error(format!(
                "documents.encoding '{}' is not supported; use utf-8",
                docs.encoding
            )));
        }
        if self.agent.max_turns == 0 {
            return Err(AppError::config_error("agent.max_turns must be at least 1"));
        }
        if self.job_search.default_limit == 0 {
            return Err(AppError::config_error("job_search.default_limit must be at least 1"));
        }
        if self.job_search.domains.is_empty() {
            return Err(AppError::config_error("job_search.domains must not be empty"));
        }
        if self.user.name.trim().is_empty() {
            return Err(AppError::config_error("user.name must not be empty"));
        }
        Ok(())
    }
}

/// Recursively replace `${NAME}` / `${NAME:default}` strings in a YAML tree.
///
/// An unset variable without a default leaves the original string untouched.
pub fn substitute_env_vars<F>(value: Value, lookup: &F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter().map(|(key, value)| (key, substitute_env_vars(value, lookup))).collect(),
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(|item| substitute_env_vars(item, lookup)).collect())
        }
        Value::String(text) => match env_reference(&text) {
            Some((name, default)) => match (lookup(name), default) {
                (Some(found), _) => typed_scalar(found),
                (None, Some(default)) => typed_scalar(default.to_string()),
                (None, None) => Value::String(text),
            },
            None => Value::String(text),
        },
        other => other,
    }
}

/// Numbers and booleans keep their YAML type; everything else stays a string.
fn typed_scalar(resolved: String) -> Value {
    match serde_yaml::from_str::<Value>(&resolved) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(resolved),
    }
}

fn env_reference(text: &str) -> Option<(&str, Option<&str>)> {
    let inner = text.strip_prefix("${")?.strip_suffix('}')?;
    match inner.split_once(':') {
        Some((name, default)) => Some((name, Some(default))),
        None => Some((inner, None)),
    }
}

fn today() -> String {
    chrono::Local::now().format("%B %d, %Y").to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_max_turns() -> u32 {
    10
}

fn default_max_history_messages() -> usize {
    20
}

fn default_limit() -> usize {
    10
}

fn default_domains() -> Vec<String> {
    vec!["boards.greenhouse.io".to_string(), "jobs.lever.co".to_string()]
}

fn default_search_timeout() -> u64 {
    15
}

fn default_max_results_per_domain() -> usize {
    50
}

fn default_extensions() -> Vec<String> {
    vec![".pdf".to_string(), ".txt".to_string(), ".md".to_string()]
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_max_results() -> usize {
    5
}

fn default_title() -> String {
    "Career Coach AI".to_string()
}

fn default_server_name() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    7861
}

fn default_chatbot_height() -> u32 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
