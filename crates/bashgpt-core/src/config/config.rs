use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Runtime settings. Every field is optional in the JSON files.
///
/// Example `.bashgpt.json` in the working directory:
/// ```json
/// {
///   "model": "gpt-4o-mini",
///   "scripts_dir": "scripts",
///   "default_temperature": 0.2
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BashGptConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Plaintext file holding the API key, relative to the working directory.
    #[serde(default = "default_api_key_path")]
    pub api_key_path: PathBuf,
    #[serde(default = "default_prompts_path")]
    pub prompts_path: PathBuf,
    /// Root under which each conversation gets its own folder.
    #[serde(default = "default_conversations_dir")]
    pub conversations_dir: PathBuf,
    /// Where extracted shell scripts are written.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
    /// Temperature used when a conversation is resumed.
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_model() -> String {
    std::env::var("BASHGPT_MODEL").unwrap_or_else(|_| "gpt-4-turbo".to_string())
}

fn default_base_url() -> String {
    std::env::var("BASHGPT_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

fn default_api_key_path() -> PathBuf {
    PathBuf::from("api_key.txt")
}

fn default_prompts_path() -> PathBuf {
    PathBuf::from("custom_prompts.json")
}

fn default_conversations_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("working")
}

fn default_temperature() -> f64 {
    0.5
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for BashGptConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_path: default_api_key_path(),
            prompts_path: default_prompts_path(),
            conversations_dir: default_conversations_dir(),
            scripts_dir: default_scripts_dir(),
            default_temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl BashGptConfig {
    /// Loads `~/.bashgpt/config.json`, then lets `./.bashgpt.json` override
    /// it key by key.
    pub fn load() -> Result<Self> {
        let local = std::env::current_dir()
            .ok()
            .map(|d| d.join(".bashgpt.json"));
        Self::load_from(&Self::resolve_path("config.json"), local.as_deref())
    }

    pub fn load_from(global: &Path, local: Option<&Path>) -> Result<Self> {
        let mut config = if global.exists() {
            let data = std::fs::read_to_string(global)
                .with_context(|| format!("reading {}", global.display()))?;
            serde_json::from_str::<BashGptConfig>(&data)
                .with_context(|| format!("parsing {}", global.display()))?
        } else {
            BashGptConfig::default()
        };

        if let Some(local) = local.filter(|p| p.exists()) {
            let data = std::fs::read_to_string(local)
                .with_context(|| format!("reading {}", local.display()))?;
            let override_val: serde_json::Value = serde_json::from_str(&data)
                .with_context(|| format!("parsing {}", local.display()))?;
            let mut base = serde_json::to_value(&config)?;
            if let (Some(base_obj), Some(over_obj)) =
                (base.as_object_mut(), override_val.as_object())
            {
                for (k, v) in over_obj {
                    base_obj.insert(k.clone(), v.clone());
                }
            }
            config = serde_json::from_value(base)?;
        }

        Ok(config)
    }

    pub fn resolve_path(relative: &str) -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bashgpt")
            .join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_yield_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BashGptConfig::load_from(
            &tmp.path().join("config.json"),
            Some(&tmp.path().join(".bashgpt.json")),
        )
        .unwrap();
        assert_eq!(config.api_key_path, PathBuf::from("api_key.txt"));
        assert_eq!(config.prompts_path, PathBuf::from("custom_prompts.json"));
        assert_eq!(config.scripts_dir, PathBuf::from("working"));
        assert_eq!(config.default_temperature, 0.5);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn local_file_overrides_global_per_key() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("config.json");
        let local = tmp.path().join(".bashgpt.json");
        std::fs::write(&global, r#"{"model":"global-model","scripts_dir":"g"}"#).unwrap();
        std::fs::write(&local, r#"{"scripts_dir":"scripts"}"#).unwrap();

        let config = BashGptConfig::load_from(&global, Some(&local)).unwrap();
        assert_eq!(config.model, "global-model");
        assert_eq!(config.scripts_dir, PathBuf::from("scripts"));
    }

    #[test]
    fn malformed_config_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("config.json");
        std::fs::write(&global, "{ not json").unwrap();

        let err = BashGptConfig::load_from(&global, None).unwrap_err();
        assert!(format!("{err:#}").contains("config.json"));
    }
}
