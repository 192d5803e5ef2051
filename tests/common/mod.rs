//! Shared testing utilities for career-coach CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DEFAULT_TEMPLATE: &str = "You are {{ agent_name }}, coaching {{ name }}.\n";

/// Testing harness providing an isolated workspace for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a workspace with a config, an instructions template, and no documents.
    pub fn new() -> Self {
        let ctx = Self { root: TempDir::new().expect("Failed to create temp directory for tests") };
        fs::create_dir_all(ctx.data_dir()).expect("Failed to create data directory");
        ctx.write_template(DEFAULT_TEMPLATE);
        ctx.write_config("");
        ctx
    }

    /// Workspace root, used as the working directory for CLI invocations.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root().join("data/me")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.yaml")
    }

    /// Write `config.yaml`; `agent_extra` lines are appended to the `agent` section.
    pub fn write_config(&self, agent_extra: &str) {
        let content = format!(
            r#"user:
  name: Amir
  data_directory: data/me
agent:
  name: CareerCoach
  model: gpt-4o-mini
  instructions_template: prompts/coach_system.md
  max_retries: 1
{}
interface:
  title: Career Coach AI
  description: Your private AI career coach.
logging:
  level: error
"#,
            agent_extra
        );
        fs::write(self.config_path(), content).expect("Failed to write config");
    }

    pub fn write_template(&self, content: &str) {
        let prompts = self.root().join("prompts");
        fs::create_dir_all(&prompts).expect("Failed to create prompts directory");
        fs::write(prompts.join("coach_system.md"), content).expect("Failed to write template");
    }

    pub fn write_document(&self, name: &str, content: &str) {
        fs::write(self.data_dir().join(name), content).expect("Failed to write document");
    }

    /// Build a command for invoking the compiled binary within the workspace.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("career-coach").expect("Failed to locate binary");
        cmd.current_dir(self.root())
            .env_remove("OPENAI_API_KEY")
            .env_remove("COACH_USER_NAME")
            .env("RUST_LOG", "off");
        cmd
    }
}
