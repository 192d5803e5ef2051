mod fake_chat_model;
mod fake_web;

pub use fake_chat_model::FakeChatModel;
pub use fake_web::{FakePageFetcher, FakeWebSearch, RecordingBrowser};

use crate::app::AppContext;
use crate::domain::{Document, DocumentKind, SystemConfig};

const TEST_CONFIG: &str = r#"
user:
  name: Amir
  data_directory: data/me
agent:
  name: CareerCoach
  model: gpt-4o-mini
  instructions_template: prompts/coach_system.md
  max_turns: 3
  max_history_messages: 4
  tools: [retrieve_context, browser_search_jobs, search_jobs]
interface:
  title: Career Coach AI
  description: Your private AI career coach.
  examples:
    - What robotics experience do I have?
"#;

pub fn test_config() -> SystemConfig {
    SystemConfig::from_yaml_str(TEST_CONFIG, |_| None).unwrap()
}

pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "resume.pdf",
            DocumentKind::Pdf,
            "Senior software engineer with robotics experience at Acme.",
        ),
        Document::new("summary.txt", DocumentKind::Text, "Enjoys mentoring and teleoperation."),
    ]
}

/// Context wired to empty fakes and the sample documents.
pub fn fake_context() -> AppContext {
    AppContext::new(
        test_config(),
        sample_documents(),
        Box::new(FakeWebSearch::new()),
        Box::new(FakePageFetcher::new()),
        Box::new(RecordingBrowser::new()),
    )
}
