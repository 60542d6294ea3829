pub mod loader;
pub mod validator;

pub use loader::{ConfigLoader, ConfigSource, LoadedConfig, SkippedConfig};
pub use validator::ConfigValidator;
