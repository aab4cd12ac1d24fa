pub mod config;
pub mod console;
pub mod prompts;
pub mod providers;
pub mod scripts;
pub mod session;

pub use config::config::BashGptConfig;
pub use config::credentials::Credentials;
pub use console::{Console, EndOfInput};
pub use prompts::registry::PromptRegistry;
pub use providers::provider::{LlmProvider, Message, Role, UnknownRole};
pub use providers::OpenAiProvider;
pub use scripts::extract::{extract_script, ExtractedScript};
pub use scripts::runner::{ScriptOutcome, ScriptRunner};
pub use session::store::{ConversationStore, StoreError};
