pub mod registry;

pub use registry::PromptRegistry;
