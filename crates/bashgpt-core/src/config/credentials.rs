use crate::config::config::BashGptConfig;
use crate::providers::provider::LlmProvider;
use crate::providers::OpenAiProvider;
use anyhow::{Context, Result};
use std::path::Path;

/// The single API token, stored as one plaintext line.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// `None` when the key file has not been created yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(Self::new(data.trim())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, format!("{}\n", self.api_key))
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn build_provider(&self, config: &BashGptConfig) -> Box<dyn LlmProvider> {
        Box::new(OpenAiProvider::new(
            &config.base_url,
            &self.api_key,
            &config.model,
        ))
    }
}
