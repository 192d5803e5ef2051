use std::process::{Command, Stdio};

use crate::domain::AppError;
use crate::ports::BrowserLauncher;

/// Opens URLs with the platform's default browser command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }

    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(url);
            command
        } else if cfg!(target_os = "windows") {
            // `start` treats the first quoted argument as a window title.
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }
}

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), AppError> {
        let mut command = Self::command(url);
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        let status = command
            .status()
            .map_err(|e| AppError::BrowserError { url: url.to_string(), details: e.to_string() })?;

        if !status.success() {
            return Err(AppError::BrowserError {
                url: url.to_string(),
                details: format!("launcher exited with {}", status),
            });
        }
        Ok(())
    }
}
