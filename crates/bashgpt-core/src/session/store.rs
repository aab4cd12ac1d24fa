use crate::providers::provider::{Message, Role, UnknownRole};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Separates the role from the content inside a message file
/// (`<role>: <content>`). Loading splits on the first occurrence only.
pub const ROLE_DELIMITER: &str = ": ";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}: no `: ` between role and content", path.display())]
    MissingDelimiter { path: PathBuf },
    #[error("{}: {source}", path.display())]
    UnknownRole {
        path: PathBuf,
        #[source]
        source: UnknownRole,
    },
}

/// One folder per conversation under `root`, one `<n>.txt` per message.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl ConversationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
        }
    }

    /// Hides `dir` (e.g. the scripts folder) from [`list_resumable`].
    /// A relative `dir` is taken from the working directory, not from `root`.
    ///
    /// [`list_resumable`]: Self::list_resumable
    pub fn exclude(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded.push(dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folder(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.folder(id).is_dir()
    }

    /// Folder names that can be resumed, sorted. Hidden and excluded
    /// directories are skipped.
    pub fn list_resumable(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("listing {}", self.root.display()))?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || self.is_excluded(&entry.path()) {
                continue;
            }
            ids.push(name);
        }
        ids.sort();
        Ok(ids)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded
            .iter()
            .any(|ex| match (ex.canonicalize(), path.canonicalize()) {
                (Ok(a), Ok(b)) => a == b,
                _ => ex == path,
            })
    }

    /// A fresh conversation id: local timestamp plus a random UUID.
    pub fn generate_id() -> String {
        format!(
            "{}-{}",
            Local::now().format("%Y%m%d%H%M%S"),
            Uuid::new_v4()
        )
    }

    /// Reads `1.txt`, `2.txt`, ... and stops at the first missing index.
    pub fn load(&self, id: &str) -> Result<Vec<Message>> {
        let folder = self.folder(id);
        let mut messages = Vec::new();
        for index in 1.. {
            let path = folder.join(format!("{index}.txt"));
            if !path.exists() {
                break;
            }
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            messages.push(decode(&path, &raw)?);
        }
        info!(conversation = id, messages = messages.len(), "conversation loaded");
        Ok(messages)
    }

    /// Rewrites every message file from the full in-memory history.
    pub fn save(&self, id: &str, messages: &[Message]) -> Result<()> {
        let folder = self.folder(id);
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("creating {}", folder.display()))?;
        for (i, message) in messages.iter().enumerate() {
            let path = folder.join(format!("{}.txt", i + 1));
            std::fs::write(&path, encode(message))
                .with_context(|| format!("writing {}", path.display()))?;
        }
        debug!(conversation = id, messages = messages.len(), "conversation saved");
        Ok(())
    }
}

fn encode(message: &Message) -> String {
    format!("{}{}{}", message.role, ROLE_DELIMITER, message.content)
}

fn decode(path: &Path, raw: &str) -> Result<Message, StoreError> {
    let (role, content) =
        raw.split_once(ROLE_DELIMITER)
            .ok_or_else(|| StoreError::MissingDelimiter {
                path: path.to_path_buf(),
            })?;
    let role = role.parse::<Role>().map_err(|source| StoreError::UnknownRole {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Message {
        role,
        content: content.to_string(),
    })
}
