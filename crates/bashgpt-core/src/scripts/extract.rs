use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SHELL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```shell\s*(.*?)\s*```").expect("valid regex"));
static FILENAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)filename: (.*?)\s*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedScript {
    /// Bare name without directory or `.sh` suffix.
    pub filename: String,
    pub content: String,
}

/// Finds a ```` ```shell ```` block and a `filename: <name>` line in a model
/// reply. Both must be present; the first occurrence of each wins.
pub fn extract_script(response: &str) -> Option<ExtractedScript> {
    let content = SHELL_BLOCK.captures(response)?.get(1)?.as_str().trim();
    let raw_name = FILENAME_LINE.captures(response)?.get(1)?.as_str().trim();
    // Only the last path component, so the script stays inside the scripts dir.
    let filename = Path::new(raw_name).file_name()?.to_str()?.trim();
    if filename.is_empty() {
        return None;
    }
    Some(ExtractedScript {
        filename: filename.to_string(),
        content: content.to_string(),
    })
}
