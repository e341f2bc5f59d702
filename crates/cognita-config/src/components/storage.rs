//! Where knowledge and source documents live

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

/// `[storage]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot file; defaults to the platform data directory
    pub data_file: Option<PathBuf>,
    /// Base directory for relative document paths
    pub text_root: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured data file, or `<data dir>/cognita/knowledge.json`
    pub fn data_file(&self) -> ConfigResult<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(defaults::APP_DIR).join(defaults::DATA_FILE_NAME))
                .ok_or(ConfigError::NoPlatformDir("data")),
        }
    }
}
