use std::sync::Arc;

use anyhow::{Context, Result};
use bashgpt_core::{
    BashGptConfig, Console, ConversationStore, EndOfInput, LlmProvider, Message, PromptRegistry,
    ScriptRunner,
};
use tracing::info;

use super::commands::{parse_temperature, Command, HELP};

const TEMPERATURE_PROMPT: &str = "Enter the desired temperature for the conversation (0.0-1.0): ";

/// The one active conversation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChatSession {
    pub id: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
}

impl ChatSession {
    pub fn fresh(system_prompt: &str, temperature: f64) -> Self {
        Self {
            id: ConversationStore::generate_id(),
            messages: vec![Message::system(system_prompt)],
            temperature,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) fn ask_temperature<C: Console + ?Sized>(console: &mut C) -> Result<f64> {
    let answer = console.read_line(TEMPERATURE_PROMPT)?;
    Ok(parse_temperature(&answer)?)
}

/// Everything the loop needs, threaded through explicitly.
pub(crate) struct Chat {
    pub session: ChatSession,
    provider: Arc<dyn LlmProvider>,
    store: ConversationStore,
    prompts: PromptRegistry,
    scripts: ScriptRunner,
    system_prompt: String,
}

impl Chat {
    pub fn new(
        session: ChatSession,
        config: &BashGptConfig,
        provider: Arc<dyn LlmProvider>,
        store: ConversationStore,
        prompts: PromptRegistry,
    ) -> Self {
        Self {
            session,
            provider,
            store,
            prompts,
            scripts: ScriptRunner::new(&config.scripts_dir),
            system_prompt: config.system_prompt.clone(),
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.session.id, &self.session.messages)
    }

    pub async fn handle_line<C: Console + ?Sized>(
        &mut self,
        line: &str,
        console: &mut C,
    ) -> Result<Flow> {
        match Command::parse(line)? {
            Command::Quit => {
                self.persist()?;
                console.print(&format!("Conversation saved to {}", self.session.id));
                return Ok(Flow::Quit);
            }
            Command::New => {
                self.persist()?;
                console.print(&format!("Conversation saved to {}", self.session.id));
                let temperature = match ask_temperature(console) {
                    Ok(temperature) => temperature,
                    // Already saved; nothing left to start.
                    Err(e) if e.is::<EndOfInput>() => return Ok(Flow::Quit),
                    Err(e) => return Err(e),
                };
                self.session = ChatSession::fresh(&self.system_prompt, temperature);
                info!(conversation = %self.session.id, temperature, "new conversation");
            }
            Command::Help => {
                console.print(HELP);
                let aliases = self.prompts.aliases();
                if !aliases.is_empty() {
                    console.print(&format!("Custom prompts: {}", aliases.join(", ")));
                }
            }
            Command::SetTemperature(temperature) => {
                self.session.temperature = temperature;
                console.print(&format!("Set temperature to {temperature}"));
            }
            Command::SetPrompt { alias, text } => {
                self.prompts
                    .set_prompt(alias, text)
                    .with_context(|| format!("saving custom prompt '{alias}'"))?;
                console.print(&format!("Set custom prompt '{alias}' to '{text}'"));
            }
            Command::Message(text) => {
                let text = self.prompts.resolve(text).to_string();
                self.send(text, console).await?;
            }
        }
        Ok(Flow::Continue)
    }

    /// One exchange, plus at most one follow-up carrying a script's error.
    async fn send<C: Console + ?Sized>(&mut self, text: String, console: &mut C) -> Result<()> {
        let response = self.exchange(text, console).await?;
        let forwarded = self.scripts.handle_response(&response, console).await?;
        // An empty stderr has nothing to tell the model.
        if let Some(error) = forwarded.filter(|e| !e.is_empty()) {
            self.exchange(error, console).await?;
        }
        Ok(())
    }

    async fn exchange<C: Console + ?Sized>(
        &mut self,
        text: String,
        console: &mut C,
    ) -> Result<String> {
        self.session.messages.push(Message::user(text));
        self.persist()?;
        let response = self
            .provider
            .complete(&self.session.messages, self.session.temperature)
            .await
            .context("completion request failed")?;
        self.session.messages.push(Message::assistant(response.clone()));
        self.persist()?;
        console.print(&format!("GPT: {response}"));
        Ok(response)
    }
}
