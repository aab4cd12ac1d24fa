mod chat;
mod setup;
mod terminal;

use anyhow::Result;
use bashgpt_core::{BashGptConfig, LlmProvider};
use std::sync::Arc;
use terminal::TerminalConsole;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = BashGptConfig::load()?;
    let creds = setup::ensure_credentials(&config.api_key_path)?;
    let provider: Arc<dyn LlmProvider> = Arc::from(creds.build_provider(&config));
    chat::run(&config, provider, &mut TerminalConsole).await
}
