use super::extract::{extract_script, ExtractedScript};
use crate::console::Console;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    Succeeded,
    Failed { code: Option<i32>, stderr: String },
}

/// Saves extracted scripts under `dir` and runs them on request.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    dir: PathBuf,
}

impl ScriptRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn script_path(&self, filename: &str) -> PathBuf {
        self.dir.join(format!("{filename}.sh"))
    }

    /// Writes `<dir>/<filename>.sh` and marks it executable.
    pub fn save(&self, script: &ExtractedScript) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.script_path(&script.filename);
        std::fs::write(&path, &script.content)
            .with_context(|| format!("writing {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .with_context(|| format!("chmod {}", path.display()))?;
        }
        debug!(path = %path.display(), bytes = script.content.len(), "script saved");
        Ok(path)
    }

    /// Runs the script through `sh`, buffering its output.
    pub async fn run(&self, path: &Path) -> Result<ScriptOutcome> {
        // "$0" keeps paths containing spaces in one word.
        let output = Command::new("sh")
            .arg("-c")
            .arg("\"$0\"")
            .arg(path)
            .output()
            .await
            .with_context(|| format!("executing {}", path.display()))?;
        if output.status.success() {
            info!(path = %path.display(), "script succeeded");
            return Ok(ScriptOutcome::Succeeded);
        }
        let code = output.status.code();
        warn!(path = %path.display(), ?code, "script failed");
        Ok(ScriptOutcome::Failed {
            code,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Saves any script in `response`, asks before running it, and on failure
    /// asks whether the captured stderr should go back to the model.
    ///
    /// Returns the error text to forward, if the operator chose to.
    pub async fn handle_response<C: Console + ?Sized>(
        &self,
        response: &str,
        console: &mut C,
    ) -> Result<Option<String>> {
        let Some(script) = extract_script(response) else {
            return Ok(None);
        };
        let path = self.save(&script)?;
        console.print(&format!("Found a shell script. Saved to {}", path.display()));

        if !console.confirm("Do you want to execute the script? (y/n) ")? {
            return Ok(None);
        }
        match self.run(&path).await? {
            ScriptOutcome::Succeeded => Ok(None),
            ScriptOutcome::Failed { stderr, .. } => {
                console.print(&format!("Script exited with error: {stderr}"));
                if console.confirm("Do you want to send the error to the AI? (y/n) ")? {
                    Ok(Some(stderr))
                } else {
                    Ok(None)
                }
            }
        }
    }
}
