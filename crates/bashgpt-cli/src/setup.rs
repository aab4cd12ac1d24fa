use anyhow::Result;
use bashgpt_core::Credentials;
use std::path::Path;
use tracing::info;

/// Reads the stored API key, or asks for one (without echo) and stores it.
pub fn ensure_credentials(path: &Path) -> Result<Credentials> {
    if let Some(creds) = Credentials::load(path)? {
        return Ok(creds);
    }
    let key = rpassword::prompt_password("Please enter your OpenAI API key: ")?;
    let creds = Credentials::new(key.trim());
    creds.save(path)?;
    info!(path = %path.display(), "api key saved");
    Ok(creds)
}
