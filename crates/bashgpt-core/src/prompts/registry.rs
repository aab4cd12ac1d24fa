use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Alias → prompt text, persisted whole as a flat JSON object.
///
/// Aliases are case-insensitive: they are stored lowercased and looked up
/// lowercased.
#[derive(Debug)]
pub struct PromptRegistry {
    path: PathBuf,
    prompts: BTreeMap<String, String>,
}

impl PromptRegistry {
    /// An absent file is an empty registry; malformed JSON is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let prompts = if path.exists() {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let raw: BTreeMap<String, String> = serde_json::from_str(&data)
                .with_context(|| format!("parsing {}", path.display()))?;
            let mut prompts = BTreeMap::new();
            for (alias, text) in raw {
                let key = alias.to_lowercase();
                if prompts.insert(key.clone(), text).is_some() {
                    warn!(
                        path = %path.display(),
                        alias = %alias,
                        "alias differs only by case from an earlier entry; earlier prompt dropped"
                    );
                }
            }
            prompts
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), count = prompts.len(), "prompt registry loaded");
        Ok(Self { path, prompts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts or replaces `alias`, then rewrites the whole file.
    pub fn set_prompt(&mut self, alias: &str, text: &str) -> Result<()> {
        self.prompts.insert(alias.to_lowercase(), text.to_string());
        self.persist()
    }

    /// The stored prompt when `input` is a known alias, otherwise `input`.
    pub fn resolve<'a>(&'a self, input: &'a str) -> &'a str {
        self.get(input).unwrap_or(input)
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.prompts.get(&alias.to_lowercase()).map(String::as_str)
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.prompts.keys().map(String::as_str).collect()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.prompts)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!(path = %self.path.display(), "prompt registry saved");
        Ok(())
    }
}
