mod commands;
mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use bashgpt_core::{
    BashGptConfig, Console, ConversationStore, EndOfInput, LlmProvider, PromptRegistry,
};
use tracing::info;

use session::{ask_temperature, Chat, ChatSession, Flow};

/// Offers the existing folders for resumption, or starts a new conversation.
fn select_conversation<C: Console + ?Sized>(
    store: &ConversationStore,
    config: &BashGptConfig,
    console: &mut C,
) -> Result<ChatSession> {
    let folders = store.list_resumable()?;
    console.print("Select a conversation to continue:");
    console.print("0: Start a new conversation");
    for (i, folder) in folders.iter().enumerate() {
        console.print(&format!("{}: {}", i + 1, folder));
    }

    let answer = console.read_line("Enter the number of your selection: ")?;
    let selection: usize = answer
        .trim()
        .parse()
        .with_context(|| format!("invalid selection `{answer}`"))?;
    if selection == 0 {
        let temperature = ask_temperature(console)?;
        let session = ChatSession::fresh(&config.system_prompt, temperature);
        info!(conversation = %session.id, temperature, "new conversation");
        return Ok(session);
    }

    let id = folders
        .get(selection - 1)
        .ok_or_else(|| anyhow::anyhow!("no conversation numbered {selection}"))?
        .clone();
    let mut messages = store.load(&id)?;
    if messages.is_empty() {
        messages.push(bashgpt_core::Message::system(&config.system_prompt));
    }
    Ok(ChatSession {
        id,
        messages,
        temperature: config.default_temperature,
    })
}

pub async fn run<C: Console + ?Sized>(
    config: &BashGptConfig,
    provider: Arc<dyn LlmProvider>,
    console: &mut C,
) -> Result<()> {
    let store = ConversationStore::new(&config.conversations_dir).exclude(&config.scripts_dir);
    let prompts = PromptRegistry::load(&config.prompts_path)?;

    let session = select_conversation(&store, config, console)?;
    let mut chat = Chat::new(session, config, provider, store, prompts);

    loop {
        let line = match console.read_line("You: ") {
            Ok(line) => line,
            Err(e) if e.is::<EndOfInput>() => "quit".to_string(),
            Err(e) => return Err(e),
        };
        if chat.handle_line(&line, console).await? == Flow::Quit {
            return Ok(());
        }
    }
}
