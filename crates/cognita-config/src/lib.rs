//! Cognita configuration
//!
//! One TOML file with `[chat]`, `[extraction]`, `[storage]` and `[logging]`
//! sections. Values resolve with precedence
//! `defaults < file < environment < command line`.

pub mod components;
pub mod defaults;
pub mod error;
pub mod loader;

pub use components::{ChatConfig, ExtractionConfig, LlmProviderType, LoggingConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult};
pub use loader::{Config, ConfigOverrides};
