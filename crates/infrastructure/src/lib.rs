pub mod config;

pub use config::{ConfigLoader, ConfigSource, ConfigValidator, LoadedConfig, SkippedConfig};
