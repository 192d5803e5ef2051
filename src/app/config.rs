//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::{AppError, SystemConfig};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Load `.env` from the working directory if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => debug!("ignoring unreadable .env: {}", err),
    }
}

/// Read, substitute, validate, and resolve the YAML config at `path`.
pub fn load_config(path: &Path) -> Result<SystemConfig, AppError> {
    if !path.is_file() {
        return Err(AppError::ConfigNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let mut config = SystemConfig::from_yaml_str(&content, |name| std::env::var(name).ok())?;

    let base_dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    config.resolve_paths(base_dir);

    if !config.agent.instructions_template.is_file() {
        return Err(AppError::TemplateNotFound(
            config.agent.instructions_template.display().to_string(),
        ));
    }

    Ok(config)
}
