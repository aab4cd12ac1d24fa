pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, Message, Role};
