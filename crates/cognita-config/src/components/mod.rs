//! Configuration sections

pub mod chat;
pub mod extraction;
pub mod logging;
pub mod storage;

pub use chat::{ChatConfig, LlmProviderType};
pub use extraction::ExtractionConfig;
pub use logging::LoggingConfig;
pub use storage::StorageConfig;
