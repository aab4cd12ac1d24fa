pub mod extract;
pub mod runner;

pub use extract::{extract_script, ExtractedScript};
pub use runner::{ScriptOutcome, ScriptRunner};
