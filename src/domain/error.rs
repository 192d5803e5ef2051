use std::io;

use thiserror::Error;

/// Library-wide error type for career-coach operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Config file does not exist at the given path.
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    /// Instructions template referenced by the config is missing.
    #[error("Instructions template not found: {0}")]
    TemplateNotFound(String),

    /// Required environment variable is not set.
    #[error("Environment variable '{0}' is not set")]
    EnvironmentVariableMissing(String),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template rendering failed.
    #[error("Failed to render template {template}: {reason}")]
    Template { template: String, reason: String },

    /// Hosted model API call failed.
    #[error("{message}")]
    ChatApiError { message: String, status: Option<u16>, retry_after_ms: Option<u64> },

    /// The model kept requesting tools past the turn limit.
    #[error("Max turns ({0}) exceeded")]
    MaxTurnsExceeded(u32),

    /// Search expression could not be parsed.
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// Search backend name is not recognized.
    #[error("Unknown search backend '{0}': must be one of google, bing, yahoo")]
    UnknownBackend(String),

    /// Web search or page fetch failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Browser could not be launched.
    #[error("Failed to open browser for {url}: {details}")]
    BrowserError { url: String, details: String },

    /// Tool invocation by the model was not understood.
    #[error("Tool '{name}' failed: {reason}")]
    ToolError { name: String, reason: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// A model API failure with no `Retry-After` hint.
    pub fn chat_api<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::ChatApiError { message: message.into(), status, retry_after_ms: None }
    }
}
