//! Interactive terminal conversation.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use dialoguer::{Error as DialoguerError, Input};

use crate::app::api;
use crate::domain::{AppError, HistoryEntry, Role};

const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

pub fn run_chat(config_path: &Path) -> Result<(), AppError> {
    let config = api::load(config_path)?;
    let title = config.interface.title.clone();
    let description = config.full_description();
    let ctx = Arc::new(api::create_context(config)?);
    let agent = api::create_agent(ctx)?;

    println!("{}", title);
    println!("{}", description);
    println!("Type 'exit' or 'quit' to leave.\n");

    let mut history: Vec<HistoryEntry> = Vec::new();
    loop {
        let Some(message) = read_message()? else {
            break;
        };
        let message = message.trim().to_string();
        if message.is_empty() {
            continue;
        }
        if EXIT_WORDS.iter().any(|word| message.eq_ignore_ascii_case(word)) {
            break;
        }

        let reply = agent.chat_reply(&history, &message);
        println!("\n{}\n", reply);

        history.push(HistoryEntry { role: Role::User, content: message });
        history.push(HistoryEntry { role: Role::Assistant, content: reply });
    }

    println!("Goodbye!");
    Ok(())
}

fn read_message() -> Result<Option<String>, AppError> {
    match Input::<String>::new().with_prompt("You").allow_empty(true).interact_text() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err))
            if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::UnexpectedEof) =>
        {
            Ok(None)
        }
        Err(DialoguerError::IO(err)) => Err(AppError::Io(err)),
    }
}
