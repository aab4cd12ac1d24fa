#[allow(clippy::module_inception)]
pub mod config;
pub mod credentials;
pub use config::BashGptConfig;
pub use credentials::Credentials;
